//! Domain entities: course records and the people acting on them

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Text with one translation per locale tag (e.g. `en-GB`, `pt-PT`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText {
    translations: BTreeMap<String, String>,
}

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-locale text.
    pub fn of(locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new().with(locale, text)
    }

    /// Add (or replace) the translation for `locale`.
    pub fn with(mut self, locale: impl Into<String>, text: impl Into<String>) -> Self {
        self.translations.insert(locale.into(), text.into());
        self
    }

    pub fn get(&self, locale: &str) -> Option<&str> {
        self.translations.get(locale).map(String::as_str)
    }

    /// Text for `locale`, falling back to the first translation by locale tag.
    pub fn content(&self, locale: &str) -> Option<&str> {
        self.get(locale)
            .or_else(|| self.translations.values().next().map(String::as_str))
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.translations.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }

    /// Merge `other` on top of `self`; translations in `other` win.
    pub fn merged(&self, other: &LocalizedText) -> Self {
        let mut translations = self.translations.clone();
        for (locale, text) in &other.translations {
            translations.insert(locale.clone(), text.clone());
        }
        Self { translations }
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.translations.values().next() {
            Some(text) => write!(f, "{text}"),
            None => Ok(()),
        }
    }
}

/// Teaching period a course is executed in, e.g. `2024/2025 S1`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcademicPeriod(String);

impl AcademicPeriod {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AcademicPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Curricular unit a course draws its content from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetenceCourse {
    pub code: String,
    #[serde(default)]
    pub name: LocalizedText,
    /// Objectives keyed by academic period name.
    #[serde(default)]
    pub objectives: BTreeMap<String, LocalizedText>,
}

impl CompetenceCourse {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: LocalizedText::new(),
            objectives: BTreeMap::new(),
        }
    }

    pub fn with_objectives(mut self, period: &AcademicPeriod, text: LocalizedText) -> Self {
        self.objectives.insert(period.as_str().to_string(), text);
        self
    }

    /// Objectives taught in `period`, if this unit has any recorded.
    pub fn objectives_for(&self, period: &AcademicPeriod) -> Option<&LocalizedText> {
        self.objectives.get(period.as_str())
    }
}

/// A course as executed in one academic period; the source of a generated site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Stable external identifier.
    pub id: String,
    /// Short course code (acronym).
    pub code: String,
    pub name: LocalizedText,
    pub period: AcademicPeriod,
    #[serde(default)]
    pub competence_courses: Vec<CompetenceCourse>,
}

impl Course {
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        name: LocalizedText,
        period: AcademicPeriod,
    ) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            name,
            period,
            competence_courses: Vec::new(),
        }
    }

    pub fn with_competence_course(mut self, competence_course: CompetenceCourse) -> Self {
        self.competence_courses.push(competence_course);
        self
    }

    /// Parse a course record from TOML.
    pub fn from_toml(content: &str) -> Result<Self, DomainError> {
        let course: Self = toml::from_str(content).map_err(|e| DomainError::InvalidCourse {
            message: e.message().to_string(),
        })?;
        course.validate()?;
        Ok(course)
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::InvalidCourse {
                message: "course id must not be empty".to_string(),
            });
        }
        if self.code.trim().is_empty() {
            return Err(DomainError::InvalidCourse {
                message: "course code must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// First objectives text recorded for this course's period, in competence course order.
    pub fn objectives(&self) -> Option<&LocalizedText> {
        self.competence_courses
            .iter()
            .find_map(|cc| cc.objectives_for(&self.period))
    }

    pub fn reference(&self) -> CourseRef {
        CourseRef {
            id: self.id.clone(),
            code: self.code.clone(),
        }
    }
}

/// Back-reference from a generated site to its course.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CourseRef {
    pub id: String,
    pub code: String,
}

impl fmt::Display for CourseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.code, self.id)
    }
}

/// Operations academic staff can be authorized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcademicOperation {
    ManageAuthorizations,
    ManageMarks,
    ManageExecutionCourses,
}

impl AcademicOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcademicOperation::ManageAuthorizations => "MANAGE_AUTHORIZATIONS",
            AcademicOperation::ManageMarks => "MANAGE_MARKS",
            AcademicOperation::ManageExecutionCourses => "MANAGE_EXECUTION_COURSES",
        }
    }
}

impl fmt::Display for AcademicOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated user; recorded as author of generated pages.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct User {
    pub username: String,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period() -> AcademicPeriod {
        AcademicPeriod::new("2024/2025 S1")
    }

    #[test]
    fn given_no_competence_course_objectives_when_resolving_then_none() {
        let course = Course::new("42", "ABC", LocalizedText::of("en-GB", "Algebra"), period())
            .with_competence_course(CompetenceCourse::new("ALG"));
        assert!(course.objectives().is_none());
    }

    #[test]
    fn given_objectives_for_other_period_when_resolving_then_skipped() {
        let other = AcademicPeriod::new("2023/2024 S2");
        let course = Course::new("42", "ABC", LocalizedText::of("en-GB", "Algebra"), period())
            .with_competence_course(
                CompetenceCourse::new("ALG")
                    .with_objectives(&other, LocalizedText::of("en-GB", "old")),
            )
            .with_competence_course(
                CompetenceCourse::new("LIN")
                    .with_objectives(&period(), LocalizedText::of("en-GB", "current")),
            );
        assert_eq!(
            course.objectives().and_then(|t| t.get("en-GB")),
            Some("current")
        );
    }

    #[test]
    fn given_localized_text_when_content_for_missing_locale_then_falls_back() {
        let text = LocalizedText::of("pt-PT", "Álgebra").with("en-GB", "Algebra");
        assert_eq!(text.content("en-GB"), Some("Algebra"));
        assert_eq!(text.content("fr-FR"), Some("Algebra"));
        assert_eq!(LocalizedText::new().content("en-GB"), None);
    }

    #[test]
    fn given_course_toml_without_code_when_parsing_then_invalid_course() {
        let content = r#"
id = "42"
code = ""
period = "2024/2025 S1"
[name]
en-GB = "Algebra"
"#;
        let result = Course::from_toml(content);
        assert!(matches!(result, Err(DomainError::InvalidCourse { .. })));
    }
}
