//! Pass driver: applies the process-wide configuration around the dispatcher.

use crate::config::PeepConfig;
use crate::diagnostics::{Diagnostic, Subject, messages};
use crate::dispatch::{self, Occurrence};
use crate::tree::TypeDeclaration;

/// Runs marker occurrences against declarations under one [`PeepConfig`].
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: PeepConfig,
}

impl Engine {
    pub fn new(config: PeepConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PeepConfig {
        &self.config
    }

    /// Handle one occurrence: the flag-usage diagnostic (if configured), then the dispatcher's.
    pub fn handle(&self, owner: &mut TypeDeclaration, occurrence: &Occurrence) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        if let Some(severity) = self.config.flag_usage.severity() {
            diagnostics.push(messages::flagged(Subject::Type(owner.name.clone()), severity).with_span(occurrence.span));
        }
        diagnostics.extend(dispatch::handle(owner, occurrence));
        diagnostics
    }

    /// Handle every occurrence found on `owner`.
    ///
    /// The type-level occurrence runs before field-level ones so fields carrying their own marker are still excluded
    /// from the type scan. Field-level occurrences keep their relative order.
    pub fn run(&self, owner: &mut TypeDeclaration, occurrences: &[Occurrence]) -> Vec<Diagnostic> {
        let (type_level, field_level): (Vec<&Occurrence>, Vec<&Occurrence>) =
            occurrences.iter().partition(|o| o.is_type_level());

        let mut diagnostics = Vec::new();
        for occurrence in type_level.into_iter().chain(field_level) {
            diagnostics.extend(self.handle(owner, occurrence));
        }
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlagUsage;
    use crate::diagnostics::Severity;
    use crate::dispatch::Marker;
    use crate::tree::{AccessLevel, Member, TypeKind, Visibility};

    fn hotel() -> (TypeDeclaration, Vec<Occurrence>) {
        let mut ty = TypeDeclaration::new("Hotel", TypeKind::Class).marked();
        ty.push(Member::field("name", Visibility::Private));
        ty.push(Member::field("stars", Visibility::Private));
        ty.push(Member::field("rooms", Visibility::Private));
        let city = ty.push(Member::field("city", Visibility::Private).marked());

        // Field occurrence listed first on purpose.
        let occurrences = vec![
            Occurrence::on_field(city, Marker::default().with_customer("TOWN")),
            Occurrence::on_type(Marker::default()),
        ];
        (ty, occurrences)
    }

    #[test]
    fn test_run_processes_type_level_first() {
        let (mut ty, occurrences) = hotel();
        let diags = Engine::default().run(&mut ty, &occurrences);

        assert!(diags.is_empty());
        let names: Vec<_> = ty.synthesized().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["__NAME", "__STARS", "__ROOMS", "TOWN"]);
    }

    #[test]
    fn test_run_twice_is_idempotent() {
        let (mut ty, occurrences) = hotel();
        let engine = Engine::default();
        engine.run(&mut ty, &occurrences);
        let once = ty.clone();

        let diags = engine.run(&mut ty, &occurrences);

        assert!(diags.is_empty());
        assert_eq!(ty, once);
    }

    #[test]
    fn test_flag_usage_warning_precedes_processing() {
        let (mut ty, occurrences) = hotel();
        let engine = Engine::new(PeepConfig::new().with_flag_usage(FlagUsage::Warning));
        let diags = engine.run(&mut ty, &occurrences);

        assert_eq!(diags.len(), 2);
        assert!(diags.iter().all(|d| d.severity == Severity::Warning));
        assert_eq!(ty.synthesized().count(), 4);
    }

    #[test]
    fn test_flag_usage_error_still_processes() {
        let (mut ty, occurrences) = hotel();
        let engine = Engine::new(PeepConfig::new().with_flag_usage(FlagUsage::Error));
        let diags = engine.run(&mut ty, &occurrences);

        assert_eq!(diags.iter().filter(|d| d.is_error()).count(), 2);
        assert_eq!(ty.synthesized().count(), 4);
    }

    #[test]
    fn test_disabled_level_yields_nothing() {
        let (mut ty, _) = hotel();
        let occurrences = vec![Occurrence::on_type(Marker::new(AccessLevel::None))];
        let diags = Engine::default().run(&mut ty, &occurrences);

        assert!(diags.is_empty());
        assert_eq!(ty.synthesized().count(), 0);
    }
}
