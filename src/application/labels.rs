//! Localized titles used by generated course sites

use tracing::debug;

use crate::domain::LocalizedText;
use crate::infrastructure::traits::LocalizationResolver;

/// Bundle all course site labels are resolved from.
pub const BUNDLE: &str = "resources.FenixEduLearningResources";

/// Every title a course site needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    Menu,
    ExtraMenu,
    InitialPage,
    ViewPost,
    Announcements,
    Summaries,
    Groups,
    Evaluations,
    BibliographicReferences,
    Schedule,
    EvaluationMethods,
    Objectives,
    LessonPlan,
    Program,
    Shifts,
    Prerequisites,
    LaboratorialComponent,
    ProgrammingAndComputingComponent,
    CrossCompetenceComponent,
    EthicalPrinciples,
    Marks,
}

impl Label {
    pub const ALL: [Label; 21] = [
        Label::Menu,
        Label::ExtraMenu,
        Label::InitialPage,
        Label::ViewPost,
        Label::Announcements,
        Label::Summaries,
        Label::Groups,
        Label::Evaluations,
        Label::BibliographicReferences,
        Label::Schedule,
        Label::EvaluationMethods,
        Label::Objectives,
        Label::LessonPlan,
        Label::Program,
        Label::Shifts,
        Label::Prerequisites,
        Label::LaboratorialComponent,
        Label::ProgrammingAndComputingComponent,
        Label::CrossCompetenceComponent,
        Label::EthicalPrinciples,
        Label::Marks,
    ];

    /// Bundle key.
    pub fn key(&self) -> &'static str {
        match self {
            Label::Menu => "label.menu",
            Label::ExtraMenu => "label.extra.menu",
            Label::InitialPage => "label.initialPage",
            Label::ViewPost => "label.viewPost",
            Label::Announcements => "label.announcements",
            Label::Summaries => "label.summaries",
            Label::Groups => "label.groups",
            Label::Evaluations => "label.evaluations",
            Label::BibliographicReferences => "label.bibliographicReferences",
            Label::Schedule => "label.schedule",
            Label::EvaluationMethods => "label.evaluationMethods",
            Label::Objectives => "label.objectives",
            Label::LessonPlan => "label.lessonsPlanings",
            Label::Program => "label.program",
            Label::Shifts => "label.shifts",
            Label::Prerequisites => "label.prerequisites",
            Label::LaboratorialComponent => "label.laboratorialComponent",
            Label::ProgrammingAndComputingComponent => "label.programmingAndComputingComponent",
            Label::CrossCompetenceComponent => "label.crossCompetenceComponent",
            Label::EthicalPrinciples => "label.ethicalPrinciples",
            Label::Marks => "label.marks",
        }
    }

    /// English text used when no bundle provides one.
    pub fn default_text(&self) -> &'static str {
        match self {
            Label::Menu => "Menu",
            Label::ExtraMenu => "Extra Pages",
            Label::InitialPage => "Initial Page",
            Label::ViewPost => "View Post",
            Label::Announcements => "Announcements",
            Label::Summaries => "Summaries",
            Label::Groups => "Groups",
            Label::Evaluations => "Evaluations",
            Label::BibliographicReferences => "Bibliographic References",
            Label::Schedule => "Schedule",
            Label::EvaluationMethods => "Evaluation Methods",
            Label::Objectives => "Objectives",
            Label::LessonPlan => "Lesson Plan",
            Label::Program => "Program",
            Label::Shifts => "Shifts",
            Label::Prerequisites => "Prerequisites",
            Label::LaboratorialComponent => "Laboratorial Component",
            Label::ProgrammingAndComputingComponent => "Programming and Computing Component",
            Label::CrossCompetenceComponent => "Cross Competence Component",
            Label::EthicalPrinciples => "Ethical Principles",
            Label::Marks => "Marks",
        }
    }

    /// Label whose bundle key is `key`.
    pub fn from_key(key: &str) -> Option<Label> {
        Label::ALL.iter().copied().find(|l| l.key() == key)
    }
}

/// Labels resolved once, when a builder is constructed.
#[derive(Debug, Clone)]
pub struct SiteLabels {
    texts: Vec<LocalizedText>,
}

impl SiteLabels {
    pub fn resolve(resolver: &dyn LocalizationResolver) -> Self {
        let texts = Label::ALL
            .iter()
            .map(|label| {
                let text = resolver.resolve(BUNDLE, label.key());
                debug!("label {} -> {}", label.key(), text);
                text
            })
            .collect();
        Self { texts }
    }

    pub fn get(&self, label: Label) -> &LocalizedText {
        &self.texts[label as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct KeyEcho;

    impl LocalizationResolver for KeyEcho {
        fn resolve(&self, bundle: &str, key: &str) -> LocalizedText {
            LocalizedText::of("en-GB", format!("{bundle}:{key}"))
        }
    }

    #[test]
    fn given_resolver_when_resolving_labels_then_each_label_has_own_key() {
        let labels = SiteLabels::resolve(&KeyEcho);
        for label in Label::ALL {
            assert_eq!(
                labels.get(label).get("en-GB"),
                Some(format!("{BUNDLE}:{}", label.key()).as_str())
            );
        }
    }

    #[test]
    fn given_bundle_name_then_matches_learning_resources_bundle() {
        assert_eq!(BUNDLE, "resources.FenixEduLearningResources");
    }

    #[test]
    fn given_all_labels_when_indexing_then_discriminants_match_positions() {
        for (i, label) in Label::ALL.iter().enumerate() {
            assert_eq!(*label as usize, i);
            assert_eq!(Label::from_key(label.key()), Some(*label));
        }
    }
}
