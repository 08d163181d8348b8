//! Entry point invoked once per marker occurrence.
//!
//! An [`Occurrence`] records where a `#[peep_in]` sits (on the type, or on field(s)) and what it asks for. The
//! dispatcher resolves it to a [`Target`] and routes to the type scan or the member path. Removing the attribute from
//! the emitted output is left to the front end.

use crate::collision::{self, Collision};
use crate::diagnostics::{Diagnostic, Subject, messages};
use crate::names::{self, NameSpec};
use crate::scan;
use crate::synth::{self, Rejection, SynthesisOutcome};
use crate::tree::{AccessLevel, MemberId, Span, TypeDeclaration, Visibility};

/// Payload of one marker annotation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Marker {
    pub level: AccessLevel,
    /// Prefix (type-level marker) or full constant name (field-level marker).
    pub customer: Option<String>,
}

impl Marker {
    pub fn new(level: AccessLevel) -> Self {
        Self { level, customer: None }
    }

    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }

    /// The customer value, with blank strings treated as absent.
    pub fn customer(&self) -> Option<&str> {
        self.customer.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// Where a marker annotation is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Site {
    Type,
    /// The declaration the marker sits on; declarations like `int a, b;` resolve to several members.
    Fields(Vec<MemberId>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub site: Site,
    pub marker: Marker,
    /// Location of the annotation itself.
    pub span: Option<Span>,
}

impl Occurrence {
    pub fn on_type(marker: Marker) -> Self {
        Self {
            site: Site::Type,
            marker,
            span: None,
        }
    }

    pub fn on_field(id: MemberId, marker: Marker) -> Self {
        Self {
            site: Site::Fields(vec![id]),
            marker,
            span: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn is_type_level(&self) -> bool {
        matches!(self.site, Site::Type)
    }
}

/// Resolved target of an occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Member(MemberId),
    Type,
}

/// Handle one marker occurrence on `owner`.
///
/// ## Returns
/// - (`Vec<Diagnostic>`): everything worth reporting, in order. Empty when synthesis succeeded or was skipped
///   silently.
///
/// ## Notes
/// - A marker on several members at once is an error and synthesizes nothing.
/// - [`AccessLevel::None`] stops after that check, without diagnostics.
/// - A field-level occurrence is the member's own marker, so the member path does not skip marked members. Marked
///   members are only excluded from type scans (see [`scan::is_eligible`]).
#[tracing::instrument(skip_all, fields(owner = %owner.name, site = ?occurrence.site))]
pub fn handle(owner: &mut TypeDeclaration, occurrence: &Occurrence) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let target = match &occurrence.site {
        Site::Type => Target::Type,
        Site::Fields(ids) if ids.len() > 1 => {
            diagnostics.push(messages::multi_field(Subject::Type(owner.name.clone())).with_span(occurrence.span));
            return diagnostics;
        }
        Site::Fields(ids) => match ids.first() {
            Some(&id) => Target::Member(id),
            None => return diagnostics,
        },
    };

    let Some(visibility) = occurrence.marker.level.visibility() else {
        tracing::debug!("marker disabled by access level");
        return diagnostics;
    };

    match target {
        Target::Member(id) => {
            let spec = NameSpec::for_member(occurrence.marker.customer());
            create_for_member(owner, id, visibility, &spec, occurrence.span, &mut diagnostics);
        }
        Target::Type => {
            let spec = NameSpec::for_type(occurrence.marker.customer());
            diagnostics.extend(scan::scan_type(owner, visibility, &spec, occurrence.span));
        }
    }

    diagnostics
}

/// Member-level synthesis path: derive, classify, synthesize.
///
/// Diagnostics are reported at `source`: the annotation for a field-level marker, the field itself when reached
/// through a type scan.
pub(crate) fn create_for_member(
    owner: &mut TypeDeclaration,
    id: MemberId,
    visibility: Visibility,
    spec: &NameSpec,
    source: Option<Span>,
    diagnostics: &mut Vec<Diagnostic>,
) -> SynthesisOutcome {
    let Some(member) = owner.member(id).filter(|m| m.kind.is_field_like()) else {
        let subject = match owner.member(id) {
            Some(m) => member_subject(owner, &m.name),
            None => Subject::Type(owner.name.clone()),
        };
        diagnostics.push(messages::unsupported_target(subject).with_span(source));
        return SynthesisOutcome::Rejected(Rejection::NotAField);
    };
    let field_name = member.name.clone();
    let subject = member_subject(owner, &field_name);

    let constant = match names::derive(&field_name, spec) {
        Ok(constant) => constant,
        Err(rejected) => {
            diagnostics.push(messages::name_rejected(subject, &rejected).with_span(source));
            return SynthesisOutcome::Rejected(Rejection::Name(rejected));
        }
    };

    match collision::classify(&constant, owner) {
        Collision::ExistsBySystem => {
            tracing::debug!(constant = %constant, "constant already synthesized");
            SynthesisOutcome::SkippedExistingBySystem
        }
        Collision::ExistsByUser => {
            diagnostics.push(messages::already_exists(subject, &constant).with_span(source));
            SynthesisOutcome::SkippedExistingByUser
        }
        Collision::Free => SynthesisOutcome::Created(synth::synthesize(owner, &constant, visibility, &field_name)),
    }
}

fn member_subject(owner: &TypeDeclaration, name: &str) -> Subject {
    Subject::Member {
        owner: owner.name.clone(),
        name: name.to_string(),
    }
}
