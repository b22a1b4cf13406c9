use crate::resume::models::{ExperienceEntry, ResumeDocument};

const TENURE_HEADING: &str =
    "COMPANY TENURE TOTALS (use these when asked how long I worked somewhere):";

/// Flattens the resume into the labeled text block embedded in the system prompt.
///
/// Sections are emitted in a fixed order: personal, summary, experience (with
/// per-company tenure totals), skills, education, certifications, publications,
/// beyond-work paragraphs. Empty sections are skipped. The output depends only
/// on the input, so the same document always yields the same bytes.
pub fn build_context(resume: &ResumeDocument) -> String {
    let mut lines: Vec<String> = Vec::new();

    let p = &resume.personal;
    lines.push(format!("Name: {}", p.name));
    lines.push(format!("Title: {}", p.title));
    if let Some(tagline) = non_empty(&p.tagline) {
        lines.push(format!("Tagline: {tagline}"));
    }
    lines.push(format!("Email: {}", p.email));
    if let Some(phone) = non_empty(&p.phone) {
        lines.push(format!("Phone: {phone}"));
    }
    if let Some(linkedin) = non_empty(&p.linkedin) {
        lines.push(format!("LinkedIn: {linkedin}"));
    }
    if let Some(github) = non_empty(&p.github) {
        lines.push(format!("GitHub: {github}"));
    }

    if !resume.summary.is_empty() {
        lines.push("\nSUMMARY:".to_string());
        for item in &resume.summary {
            lines.push(format!("- {}: {}", item.label, item.text));
        }
    }

    if !resume.experience.is_empty() {
        lines.push("\nEXPERIENCE:".to_string());
        for (i, job) in resume.experience.iter().enumerate() {
            lines.push(format!(
                "{}. {} — {} ({} – {})",
                i + 1,
                job.title,
                job.company,
                job.start_date,
                job.end_date
            ));
            for bullet in &job.bullets {
                lines.push(format!("   - {bullet}"));
            }
        }

        lines.push(format!("\n{TENURE_HEADING}"));
        for tenure in company_tenures(&resume.experience) {
            lines.push(format!(
                "- {}: {} – {}",
                tenure.company, tenure.start, tenure.end
            ));
        }
    }

    if !resume.skills.is_empty() {
        lines.push("\nTECHNICAL SKILLS:".to_string());
        for group in &resume.skills {
            lines.push(format!("- {}: {}", group.category, group.items.join(", ")));
        }
    }

    if !resume.education.is_empty() {
        lines.push("\nEDUCATION:".to_string());
        for edu in &resume.education {
            lines.push(format!("- {} — {} ({})", edu.degree, edu.school, edu.year));
        }
    }

    if !resume.certifications.is_empty() {
        lines.push("\nCERTIFICATIONS:".to_string());
        for cert in &resume.certifications {
            lines.push(format!("- {}", cert.name));
        }
    }

    if !resume.publications.is_empty() {
        lines.push("\nSELECTED PUBLICATIONS:".to_string());
        for publication in &resume.publications {
            let mut line = format!("- \"{}\"", publication.title);
            if let Some(journal) = non_empty(&publication.journal) {
                line.push_str(&format!(" — {journal}"));
            }
            if let Some(year) = publication.year {
                line.push_str(&format!(", {year}"));
            }
            lines.push(line);
        }
    }

    let paragraphs = resume
        .beyond_work
        .as_ref()
        .map(|b| b.paragraphs.as_slice())
        .unwrap_or_default();
    if !paragraphs.is_empty() {
        lines.push("\nBEYOND WORK / PERSONAL INTERESTS:".to_string());
        for paragraph in paragraphs {
            lines.push(format!("- {paragraph}"));
        }
    }

    lines.join("\n").trim().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyTenure<'a> {
    pub company: &'a str,
    pub start: &'a str,
    pub end: &'a str,
}

/// Collapses multiple roles at the same employer into one span.
///
/// Relies on the most-recent-first ordering of `experience`: the first entry
/// seen for a company supplies the end date and every later entry overwrites
/// the start date, so the last (oldest) entry wins. Dates are free text
/// ("May 2019", "Present") and are never parsed or compared.
pub fn company_tenures(experience: &[ExperienceEntry]) -> Vec<CompanyTenure<'_>> {
    let mut tenures: Vec<CompanyTenure<'_>> = Vec::new();

    for job in experience {
        match tenures.iter_mut().find(|t| t.company == job.company) {
            Some(existing) => existing.start = &job.start_date,
            None => tenures.push(CompanyTenure {
                company: &job.company,
                start: &job.start_date,
                end: &job.end_date,
            }),
        }
    }

    tenures
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::models::{BeyondWork, PersonalInfo};
    use crate::resume::tests::sample_resume;

    fn minimal_resume() -> ResumeDocument {
        ResumeDocument {
            meta: None,
            personal: PersonalInfo {
                name: "Jordan Avery".to_string(),
                title: "Staff Engineer".to_string(),
                tagline: Some(String::new()),
                location: None,
                email: "jordan@example.com".to_string(),
                phone: None,
                linkedin: None,
                github: None,
                resume_pdf: None,
            },
            summary: vec![],
            experience: vec![],
            skills: vec![],
            education: vec![],
            certifications: vec![],
            publications: vec![],
            stats: vec![],
            beyond_work: None,
        }
    }

    #[test]
    fn test_minimal_resume_has_only_personal_lines() {
        assert_eq!(
            build_context(&minimal_resume()),
            "Name: Jordan Avery\nTitle: Staff Engineer\nEmail: jordan@example.com"
        );
    }

    #[test]
    fn test_build_context_is_deterministic() {
        let resume = sample_resume();
        assert_eq!(build_context(&resume), build_context(&resume));
    }

    #[test]
    fn test_sections_appear_in_fixed_order() {
        let context = build_context(&sample_resume());
        let headings = [
            "Name:",
            "\nSUMMARY:",
            "\nEXPERIENCE:",
            "\nCOMPANY TENURE TOTALS",
            "\nTECHNICAL SKILLS:",
            "\nEDUCATION:",
            "\nCERTIFICATIONS:",
            "\nSELECTED PUBLICATIONS:",
            "\nBEYOND WORK / PERSONAL INTERESTS:",
        ];
        let positions: Vec<usize> = headings
            .iter()
            .map(|h| context.find(h).unwrap_or_else(|| panic!("missing {h}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_experience_lines_are_numbered_with_bullets() {
        let context = build_context(&sample_resume());
        assert!(context.contains(
            "1. Principal Engineer — Northwind Labs (March 2021 – Present)\n   - Led the platform team."
        ));
        assert!(context.contains("3. Software Engineer — Contoso (June 2014 – December 2016)"));
    }

    #[test]
    fn test_tenure_spans_roles_at_same_company() {
        let resume = sample_resume();
        let tenures = company_tenures(&resume.experience);
        assert_eq!(
            tenures,
            vec![
                CompanyTenure {
                    company: "Northwind Labs",
                    start: "January 2017",
                    end: "Present",
                },
                CompanyTenure {
                    company: "Contoso",
                    start: "June 2014",
                    end: "December 2016",
                },
            ]
        );
        let context = build_context(&resume);
        assert!(context.contains("- Northwind Labs: January 2017 – Present"));
    }

    #[test]
    fn test_publication_optional_parts() {
        let context = build_context(&sample_resume());
        assert!(context.contains("- \"Cache-aware scheduling\" — Systems Journal, 2019"));
        assert!(context.contains("- \"Notes on tail latency\"\n"));
    }

    #[test]
    fn test_skills_and_beyond_work() {
        let mut resume = sample_resume();
        assert!(build_context(&resume).contains("- Languages: Rust, Go, SQL"));

        resume.beyond_work = Some(BeyondWork { paragraphs: vec![] });
        assert!(!build_context(&resume).contains("BEYOND WORK"));
    }
}
