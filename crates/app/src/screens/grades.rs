//! Grades grouped by semester, with the GPA summary

use serde::Serialize;
use serde_json::Value;
use studentportal_core::{StudentPortalApi, ViewState};
use studentportal_domain::{list_items, ApiError, Payload};

pub const NO_SEMESTER: &str = "No Semester";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradesData {
    pub grades: Vec<Value>,
    pub gpa: Payload,
    pub semesters: Vec<Value>,
}

/// Grades of one semester, titled `"<year> - <name>"`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeSection {
    pub title: String,
    pub grades: Vec<Value>,
}

impl GradesData {
    /// Sections in first-seen order
    #[must_use]
    pub fn sections(&self) -> Vec<GradeSection> {
        let mut sections: Vec<GradeSection> = Vec::new();
        for grade in &self.grades {
            let title = semester_label(grade, &self.semesters);
            match sections.iter_mut().find(|section| section.title == title) {
                Some(section) => section.grades.push(grade.clone()),
                None => sections.push(GradeSection { title, grades: vec![grade.clone()] }),
            }
        }
        sections
    }
}

/// Label of the semester a grade belongs to.
///
/// The grade may embed the semester object or only reference it by id, in
/// which case it is resolved against `semesters`.
#[must_use]
pub fn semester_label(grade: &Value, semesters: &[Value]) -> String {
    let semester = match grade.get("semester") {
        Some(Value::Object(_)) => grade.get("semester"),
        Some(Value::Number(id)) => {
            id.as_u64().and_then(|id| semesters.iter().find(|s| super::has_id(s, id)))
        }
        _ => None,
    };

    semester
        .and_then(|semester| {
            let year = text(semester.get("year")?)?;
            let name = text(semester.get("name")?)?;
            Some(format!("{year} - {name}"))
        })
        .unwrap_or_else(|| NO_SEMESTER.to_string())
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub struct GradesScreen {
    api: StudentPortalApi,
    pub state: ViewState<GradesData>,
}

impl GradesScreen {
    pub fn new(api: StudentPortalApi) -> Self {
        Self { api, state: ViewState::new() }
    }

    pub async fn load(&mut self) -> &ViewState<GradesData> {
        self.state.load(fetch(&self.api)).await
    }

    pub async fn refresh(&mut self) -> &ViewState<GradesData> {
        self.state.refresh(fetch(&self.api)).await
    }
}

async fn fetch(api: &StudentPortalApi) -> Result<GradesData, ApiError> {
    let (grades, gpa, semesters) =
        futures::try_join!(api.fetch_grades(), api.fetch_gpa(), api.fetch_semesters())?;
    Ok(GradesData { grades: list_items(&grades), gpa, semesters: list_items(&semesters) })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_grades_grouped_by_embedded_semester() {
        let data = GradesData {
            grades: vec![
                json!({"id": 1, "semester": {"id": 1, "year": 2024, "name": "Fall"}}),
                json!({"id": 2, "semester": null}),
                json!({"id": 3, "semester": {"id": 1, "year": 2024, "name": "Fall"}}),
                json!({"id": 4, "semester": {"id": 2, "year": "2025", "name": "Spring"}}),
            ],
            gpa: json!({"gpa": 3.4}),
            semesters: vec![],
        };

        let sections = data.sections();
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["2024 - Fall", NO_SEMESTER, "2025 - Spring"]);
        assert_eq!(sections[0].grades.len(), 2);
    }

    #[test]
    fn test_semester_reference_resolved_from_list() {
        let semesters = vec![json!({"id": 7, "year": 2023, "name": "Summer"})];

        assert_eq!(semester_label(&json!({"semester": 7}), &semesters), "2023 - Summer");
        assert_eq!(semester_label(&json!({"semester": 8}), &semesters), NO_SEMESTER);
        assert_eq!(semester_label(&json!({"score": 80}), &semesters), NO_SEMESTER);
    }
}
