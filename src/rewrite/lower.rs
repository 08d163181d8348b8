//! Lower `syn` items into the engine's declaration tree.

use std::collections::HashMap;

use peephole_core::diagnostics::messages;
use peephole_core::{
    Diagnostic, Marker, Member, MemberKind, Modifiers, Occurrence, Subject, TypeDeclaration, TypeKind, Visibility,
};
use peephole_syntax::{MARKER_ARGUMENTS_HINT, ident_text, is_marked, markers, parse_marker, visibility};
use quote::ToTokens;
use syn::spanned::Spanned;
use syn::{Attribute, Fields, ImplItem, Item, TraitItem};

use crate::source_map::LineIndex;

/// A marked type ready for the engine.
pub struct Lowered {
    pub decl: TypeDeclaration,
    /// Occurrences in source order.
    pub occurrences: Vec<Occurrence>,
    pub ident: syn::Ident,
    pub generics: syn::Generics,
}

/// Members declared by inherent `impl` blocks of one module scope, keyed by self type name.
#[derive(Debug, Default)]
pub struct ImplIndex {
    members: HashMap<String, Vec<Member>>,
}

impl ImplIndex {
    pub fn build(items: &[Item], index: &LineIndex<'_>) -> Self {
        let mut members: HashMap<String, Vec<Member>> = HashMap::new();
        for item in items {
            let Item::Impl(block) = item else { continue };
            if block.trait_.is_some() {
                continue;
            }
            let syn::Type::Path(path) = block.self_ty.as_ref() else {
                continue;
            };
            let Some(segment) = path.path.segments.last() else {
                continue;
            };

            let entry = members.entry(ident_text(&segment.ident)).or_default();
            for impl_item in &block.items {
                match impl_item {
                    ImplItem::Const(c) => entry.push(
                        Member::constant(ident_text(&c.ident), visibility(&c.vis))
                            .with_type(c.ty.to_token_stream().to_string())
                            .with_span(index.span(c.ident.span())),
                    ),
                    ImplItem::Fn(f) => {
                        let modifiers = Modifiers {
                            visibility: visibility(&f.vis),
                            is_static: f.sig.receiver().is_none(),
                            is_final: false,
                        };
                        entry.push(
                            Member::new(ident_text(&f.sig.ident), MemberKind::Method, modifiers)
                                .with_span(index.span(f.sig.ident.span())),
                        );
                    }
                    _ => {}
                }
            }
        }
        Self { members }
    }

    fn members_of(&self, type_name: &str) -> &[Member] {
        self.members.get(type_name).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Lower `item` when it carries at least one marker.
///
/// Malformed markers are reported into `diagnostics` and skipped; the remaining ones become occurrences. Markers on
/// items that are not types are reported as unsupported and yield `None`.
pub fn lower_item(
    item: &Item,
    impls: &ImplIndex,
    attribute: &str,
    index: &LineIndex<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Lowered> {
    let mut cx = LowerCx {
        attribute,
        index,
        diagnostics,
    };
    match item {
        Item::Struct(s) => {
            let fields: Vec<&syn::Field> = s.fields.iter().collect();
            cx.lower_type(&s.ident, &s.generics, &s.attrs, TypeKind::Class, &fields, impls)
        }
        Item::Union(u) => {
            let fields: Vec<&syn::Field> = u.fields.named.iter().collect();
            cx.lower_type(&u.ident, &u.generics, &u.attrs, TypeKind::Class, &fields, impls)
        }
        Item::Enum(e) => {
            let owner = ident_text(&e.ident);
            for variant in &e.variants {
                for (position, field) in variant.fields.iter().enumerate() {
                    let Some(attr) = markers(&field.attrs, cx.attribute).next() else {
                        continue;
                    };
                    let name = match &field.ident {
                        Some(ident) => format!("{}::{}", variant.ident, ident_text(ident)),
                        None => format!("{}::{position}", variant.ident),
                    };
                    let span = index.span(attr.span());
                    cx.diagnostics.push(
                        messages::unsupported_target(Subject::Member {
                            owner: owner.clone(),
                            name,
                        })
                        .with_span(Some(span)),
                    );
                }
            }
            cx.lower_type(&e.ident, &e.generics, &e.attrs, TypeKind::Enum, &[], impls)
        }
        Item::Trait(t) => cx.lower_trait(t),
        other => {
            cx.report_stray(other);
            None
        }
    }
}

struct LowerCx<'a, 'd> {
    attribute: &'a str,
    index: &'a LineIndex<'a>,
    diagnostics: &'d mut Vec<Diagnostic>,
}

impl LowerCx<'_, '_> {
    fn lower_type(
        &mut self,
        ident: &syn::Ident,
        generics: &syn::Generics,
        attrs: &[Attribute],
        kind: TypeKind,
        fields: &[&syn::Field],
        impls: &ImplIndex,
    ) -> Option<Lowered> {
        let name = ident_text(ident);
        let type_marked = is_marked(attrs, self.attribute);
        let any_field_marked = fields.iter().any(|f| is_marked(&f.attrs, self.attribute));
        if !type_marked && !any_field_marked {
            return None;
        }

        let mut decl = TypeDeclaration::new(name.clone(), kind).with_span(self.index.span(ident.span()));
        decl.marked = type_marked;
        let mut occurrences = Vec::new();

        if let Some(marker) = self.marker(attrs, Subject::Type(name.clone())) {
            occurrences.push(marker.into_occurrence(None));
        }

        for (position, field) in fields.iter().enumerate() {
            let (member_name, kind, span) = match &field.ident {
                Some(ident) => (ident_text(ident), MemberKind::Field, ident.span()),
                None => (position.to_string(), MemberKind::Positional, field.ty.span()),
            };
            let mut member = Member::new(member_name.clone(), kind, Modifiers::instance(visibility(&field.vis)))
                .with_type(field.ty.to_token_stream().to_string())
                .with_span(self.index.span(span));
            let subject = Subject::Member {
                owner: name.clone(),
                name: member_name,
            };
            let marker = self.marker(&field.attrs, subject);
            member.marked = is_marked(&field.attrs, self.attribute);
            let id = decl.push(member);
            if let Some(marker) = marker {
                occurrences.push(marker.into_occurrence(Some(id)));
            }
        }

        for member in impls.members_of(&name) {
            decl.push(member.clone());
        }

        Some(Lowered {
            decl,
            occurrences,
            ident: ident.clone(),
            generics: generics.clone(),
        })
    }

    fn lower_trait(&mut self, item: &syn::ItemTrait) -> Option<Lowered> {
        let name = ident_text(&item.ident);
        let type_marked = is_marked(&item.attrs, self.attribute);
        let any_item_marked = item.items.iter().any(|i| is_marked(trait_item_attrs(i), self.attribute));
        if !type_marked && !any_item_marked {
            return None;
        }

        let mut decl = TypeDeclaration::new(name.clone(), TypeKind::Interface).with_span(self.index.span(item.ident.span()));
        decl.marked = type_marked;
        let mut occurrences = Vec::new();
        if let Some(marker) = self.marker(&item.attrs, Subject::Type(name.clone())) {
            occurrences.push(marker.into_occurrence(None));
        }

        for trait_item in &item.items {
            let member = match trait_item {
                TraitItem::Const(c) => Member::constant(ident_text(&c.ident), Visibility::Public)
                    .with_type(c.ty.to_token_stream().to_string())
                    .with_span(self.index.span(c.ident.span())),
                TraitItem::Fn(f) => Member::new(
                    ident_text(&f.sig.ident),
                    MemberKind::Method,
                    Modifiers::instance(Visibility::Public),
                )
                .with_span(self.index.span(f.sig.ident.span())),
                _ => continue,
            };
            let subject = Subject::Member {
                owner: name.clone(),
                name: member.name.clone(),
            };
            let attrs = trait_item_attrs(trait_item);
            let marker = self.marker(attrs, subject);
            let id = decl.push(Member {
                marked: is_marked(attrs, self.attribute),
                ..member
            });
            if let Some(marker) = marker {
                occurrences.push(marker.into_occurrence(Some(id)));
            }
        }

        Some(Lowered {
            decl,
            occurrences,
            ident: item.ident.clone(),
            generics: item.generics.clone(),
        })
    }

    /// The single valid marker in `attrs`, reporting duplicates and malformed arguments against `subject`.
    fn marker(&mut self, attrs: &[Attribute], subject: Subject) -> Option<SpannedMarker> {
        let attribute = self.attribute;
        let mut found = markers(attrs, attribute);
        let first = found.next()?;
        let span = self.index.span(first.span());
        for duplicate in found {
            self.diagnostics.push(
                Diagnostic::error(format!("duplicate #[{attribute}] attribute"), subject.clone())
                    .with_span(Some(self.index.span(duplicate.span())))
                    .with_hint("only the first marker is used"),
            );
        }
        match parse_marker(first) {
            Ok(marker) => Some(SpannedMarker { marker, span }),
            Err(e) => {
                self.diagnostics.push(
                    Diagnostic::error(e.to_string(), subject)
                        .with_span(Some(self.index.span(e.span())))
                        .with_hint(MARKER_ARGUMENTS_HINT),
                );
                None
            }
        }
    }

    /// Markers on items that can never be targets: free functions, statics, impl blocks and so on.
    fn report_stray(&mut self, item: &Item) {
        let (label, attrs): (String, Vec<&Attribute>) = match item {
            Item::Fn(f) => (ident_text(&f.sig.ident), f.attrs.iter().collect()),
            Item::Const(c) => (ident_text(&c.ident), c.attrs.iter().collect()),
            Item::Static(s) => (ident_text(&s.ident), s.attrs.iter().collect()),
            Item::Type(t) => (ident_text(&t.ident), t.attrs.iter().collect()),
            Item::Mod(m) => (ident_text(&m.ident), m.attrs.iter().collect()),
            Item::Impl(block) => {
                let label = block.self_ty.to_token_stream().to_string();
                let attrs = block.attrs.iter().chain(block.items.iter().flat_map(impl_item_attrs)).collect();
                (label, attrs)
            }
            _ => return,
        };
        let attribute = self.attribute;
        for attr in attrs.into_iter().filter(|a| a.path().is_ident(attribute)) {
            self.diagnostics.push(
                messages::unsupported_target(Subject::Type(label.clone()))
                    .with_span(Some(self.index.span(attr.span()))),
            );
        }
    }
}

struct SpannedMarker {
    marker: Marker,
    span: peephole_core::Span,
}

impl SpannedMarker {
    fn into_occurrence(self, member: Option<peephole_core::MemberId>) -> Occurrence {
        let occurrence = match member {
            Some(id) => Occurrence::on_field(id, self.marker),
            None => Occurrence::on_type(self.marker),
        };
        occurrence.with_span(self.span)
    }
}

/// Remove every marker attribute from `item`, its fields, variants and associated items.
///
/// Returns whether anything was removed.
pub fn strip_markers(item: &mut Item, attribute: &str) -> bool {
    let mut removed = false;
    let mut strip = |attrs: &mut Vec<Attribute>| {
        let before = attrs.len();
        attrs.retain(|a| !a.path().is_ident(attribute));
        removed |= attrs.len() != before;
    };

    match item {
        Item::Struct(s) => {
            strip(&mut s.attrs);
            s.fields.iter_mut().for_each(|f| strip(&mut f.attrs));
        }
        Item::Union(u) => {
            strip(&mut u.attrs);
            u.fields.named.iter_mut().for_each(|f| strip(&mut f.attrs));
        }
        Item::Enum(e) => {
            strip(&mut e.attrs);
            for variant in &mut e.variants {
                strip(&mut variant.attrs);
                match &mut variant.fields {
                    Fields::Named(fields) => fields.named.iter_mut().for_each(|f| strip(&mut f.attrs)),
                    Fields::Unnamed(fields) => fields.unnamed.iter_mut().for_each(|f| strip(&mut f.attrs)),
                    Fields::Unit => {}
                }
            }
        }
        Item::Trait(t) => {
            strip(&mut t.attrs);
            for trait_item in &mut t.items {
                match trait_item {
                    TraitItem::Const(c) => strip(&mut c.attrs),
                    TraitItem::Fn(f) => strip(&mut f.attrs),
                    _ => {}
                }
            }
        }
        Item::Impl(block) => {
            strip(&mut block.attrs);
            for impl_item in &mut block.items {
                match impl_item {
                    ImplItem::Const(c) => strip(&mut c.attrs),
                    ImplItem::Fn(f) => strip(&mut f.attrs),
                    _ => {}
                }
            }
        }
        Item::Fn(f) => strip(&mut f.attrs),
        Item::Const(c) => strip(&mut c.attrs),
        Item::Static(s) => strip(&mut s.attrs),
        Item::Type(t) => strip(&mut t.attrs),
        Item::Mod(m) => strip(&mut m.attrs),
        _ => {}
    }
    removed
}

fn trait_item_attrs(item: &TraitItem) -> &[Attribute] {
    match item {
        TraitItem::Const(c) => &c.attrs,
        TraitItem::Fn(f) => &f.attrs,
        _ => &[],
    }
}

fn impl_item_attrs(item: &ImplItem) -> &[Attribute] {
    match item {
        ImplItem::Const(c) => &c.attrs,
        ImplItem::Fn(f) => &f.attrs,
        _ => &[],
    }
}
