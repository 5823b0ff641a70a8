//! Display Filter: decides which entities are shown under a filter state.
//!
//! An entity's tags are always its parsed `TagRef` list; aliases are read
//! from the model's registry through the reference's id.

use std::collections::HashSet;

use crate::models::filter::FilterState;
use crate::models::resume::{CompanyProject, Description, Entity, ResumeModel, TagRef, MINIMUM_IMPORTANCE};
use crate::resume::context::Context;

/// Visibility of a hydration context. Meta blocks and the resume root are
/// pinned and always shown.
pub fn is_context_visible(context: &Context<'_>, model: &ResumeModel, filter: Option<&FilterState>) -> bool {
    match context {
        Context::Meta(_) | Context::Resume(_) => true,
        other => is_visible(other, model, filter),
    }
}

/// Visibility of an entity.
///
/// Without a filter, only the importance floor applies. With one, a search
/// term must hit a tag id or alias, a description, or a nested project, and
/// active tags must intersect the entity's, its descriptions' or a nested
/// project's tags. Both checks must pass when both are present.
pub fn is_visible<E: Entity + ?Sized>(entity: &E, model: &ResumeModel, filter: Option<&FilterState>) -> bool {
    let Some(filter) = filter else {
        return entity
            .importance()
            .map_or(true, |importance| importance > MINIMUM_IMPORTANCE);
    };

    if let Some(search) = filter.search_term() {
        let found = tags_match_search(entity.tags(), model, &search)
            || descriptions_match_search(entity.descriptions(), &search)
            || projects_match_search(entity.projects(), model, &search);
        if !found {
            return false;
        }
    }

    if !filter.tags.is_empty() {
        let active: HashSet<&str> = filter.tags.iter().map(String::as_str).collect();
        let found = intersects(entity.tags(), &active)
            || descriptions_intersect(entity.descriptions(), &active)
            || projects_intersect(entity.projects(), &active);
        if !found {
            return false;
        }
    }

    true
}

fn tags_match_search(tags: &[TagRef], model: &ResumeModel, search: &str) -> bool {
    tags.iter().any(|tag| {
        tag.id.contains(search)
            || model.tag(&tag.id).is_some_and(|record| {
                record
                    .aliases
                    .iter()
                    .any(|alias| alias.to_lowercase().contains(search))
            })
    })
}

fn descriptions_match_search(descriptions: &[Description], search: &str) -> bool {
    descriptions
        .iter()
        .any(|d| d.text.to_lowercase().contains(search))
}

fn projects_match_search(projects: &[CompanyProject], model: &ResumeModel, search: &str) -> bool {
    projects.iter().any(|p| {
        tags_match_search(&p.tags, model, search) || descriptions_match_search(&p.descriptions, search)
    })
}

fn intersects(tags: &[TagRef], active: &HashSet<&str>) -> bool {
    tags.iter().any(|tag| active.contains(tag.id.as_str()))
}

fn descriptions_intersect(descriptions: &[Description], active: &HashSet<&str>) -> bool {
    descriptions.iter().any(|d| intersects(&d.tags, active))
}

fn projects_intersect(projects: &[CompanyProject], active: &HashSet<&str>) -> bool {
    projects
        .iter()
        .any(|p| intersects(&p.tags, active) || descriptions_intersect(&p.descriptions, active))
}
