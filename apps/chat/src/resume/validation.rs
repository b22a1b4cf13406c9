use std::collections::HashSet;

use crate::resume::models::ResumeDocument;

/// Checks the structural rules a resume must satisfy before it is used as
/// grounding material. Returns every problem found, not just the first.
pub fn validate_resume(resume: &ResumeDocument) -> Vec<String> {
    let mut problems = Vec::new();
    let personal = &resume.personal;

    if personal.name.trim().is_empty() {
        problems.push("personal.name is empty".to_string());
    }
    if personal.title.trim().is_empty() {
        problems.push("personal.title is empty".to_string());
    }
    if !looks_like_email(&personal.email) {
        problems.push(format!(
            "personal.email '{}' is not a valid address",
            personal.email
        ));
    }

    let mut seen_ids = HashSet::new();
    for (i, job) in resume.experience.iter().enumerate() {
        let required = [
            ("id", &job.id),
            ("title", &job.title),
            ("company", &job.company),
            ("startDate", &job.start_date),
            ("endDate", &job.end_date),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                problems.push(format!("experience[{i}].{field} is empty"));
            }
        }
        if !job.id.is_empty() && !seen_ids.insert(job.id.as_str()) {
            problems.push(format!("experience[{i}].id '{}' is duplicated", job.id));
        }
    }

    for (i, group) in resume.skills.iter().enumerate() {
        if group.category.trim().is_empty() {
            problems.push(format!("skills[{i}].category is empty"));
        }
        if group.items.is_empty() {
            problems.push(format!("skills[{i}] has no items"));
        }
    }

    problems
}

/// `local@domain.tld` with no whitespace.
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
