//! Data contexts the hydrator binds template nodes against.
//!
//! `Context` is the closed set of things a template node can be bound to, and
//! `Field` is the closed set of names a marker can bind. `Context::field`
//! is the accessor table between the two.

use std::borrow::Cow;

use crate::models::resume::{
    CompanyProject, Description, Education, Entity, Job, Meta, PersonalProject, ResumeModel,
    TagRef,
};
use crate::resume::tags::TagRecord;

/// Field names a template marker can bind to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    // Resume root
    Companies,
    PersonalProjects,
    Educations,
    SortedTags,
    Meta,
    // Shared by entities
    Tags,
    Descs,
    Title,
    Importance,
    // Job
    Company,
    Alias,
    Time,
    Projects,
    // Company project
    CompanyProject,
    // Personal project
    PersonalProject,
    // Education
    Education,
    Location,
    Degree,
    Majors,
    Minors,
    Gpa,
    Accolades,
    // Tag
    Id,
    Aliases,
    Uses,
    // Description
    Text,
    Length,
    /// Any other marker; only meta blocks resolve these, by name.
    Named(String),
}

impl Field {
    /// Resolves a marker name. Every marker resolves; unknown names become
    /// `Named` and only match free-form meta fields.
    pub fn from_marker(marker: &str) -> Field {
        match marker {
            "companies" => Field::Companies,
            "personalProjects" => Field::PersonalProjects,
            "educations" => Field::Educations,
            "sortedTags" => Field::SortedTags,
            "meta" => Field::Meta,
            "tags" => Field::Tags,
            "descs" => Field::Descs,
            "title" => Field::Title,
            "importance" => Field::Importance,
            "company" => Field::Company,
            "alias" => Field::Alias,
            "time" => Field::Time,
            "projects" => Field::Projects,
            "companyProject" => Field::CompanyProject,
            "personalProject" => Field::PersonalProject,
            "education" => Field::Education,
            "location" => Field::Location,
            "degree" => Field::Degree,
            "majors" => Field::Majors,
            "minors" => Field::Minors,
            "gpa" | "gPA" => Field::Gpa,
            "accolades" => Field::Accolades,
            "id" => Field::Id,
            "aliases" => Field::Aliases,
            "uses" => Field::Uses,
            "text" => Field::Text,
            "length" => Field::Length,
            other => Field::Named(other.to_string()),
        }
    }

    /// Collections rendered in full regardless of the filter state.
    pub fn always_shown(&self) -> bool {
        matches!(self, Field::Meta | Field::SortedTags)
    }
}

/// One thing a template node can be hydrated against.
#[derive(Debug, Clone, Copy)]
pub enum Context<'a> {
    Resume(&'a ResumeModel),
    Job(&'a Job),
    CompanyProject(&'a CompanyProject),
    PersonalProject(&'a PersonalProject),
    Education(&'a Education),
    Meta(&'a Meta),
    /// A tag, with the importance of the reference that listed it, if any.
    Tag {
        record: &'a TagRecord,
        importance: Option<i64>,
    },
    Description(&'a Description),
}

/// A field's value, before the hydrator decides how to render it.
#[derive(Debug, Clone)]
pub enum FieldValue<'a> {
    /// Plain text, escaped on output.
    Text(Cow<'a, str>),
    /// Pre-formatted markup (description text).
    Markup(&'a str),
    /// Rendered as a hyperlink.
    Link(&'a str),
    /// A sequence of plain strings.
    Texts(&'a [String]),
    /// A sequence of nested contexts.
    Contexts(Vec<Context<'a>>),
}

/// An element of a collection being hydrated.
#[derive(Debug, Clone)]
pub enum CollectionEntry<'a> {
    Entity(Context<'a>),
    /// A value that is not an entity, e.g. a bare string in `majors`.
    Malformed,
}

impl<'a> FieldValue<'a> {
    /// Entries for collection hydration.
    pub fn into_entries(self) -> Vec<CollectionEntry<'a>> {
        match self {
            FieldValue::Contexts(contexts) => {
                contexts.into_iter().map(CollectionEntry::Entity).collect()
            }
            FieldValue::Texts(items) => items.iter().map(|_| CollectionEntry::Malformed).collect(),
            FieldValue::Text(_) | FieldValue::Markup(_) | FieldValue::Link(_) => {
                vec![CollectionEntry::Malformed]
            }
        }
    }
}

impl<'a> Context<'a> {
    /// Reads `field` from this context, or `None` when the context lacks it.
    pub fn field(&self, field: &Field, model: &'a ResumeModel) -> Option<FieldValue<'a>> {
        match (*self, field) {
            (Context::Resume(m), Field::Companies) => Some(FieldValue::Contexts(
                m.companies().iter().map(Context::Job).collect(),
            )),
            (Context::Resume(m), Field::PersonalProjects) => Some(FieldValue::Contexts(
                m.personal_projects()
                    .iter()
                    .map(Context::PersonalProject)
                    .collect(),
            )),
            (Context::Resume(m), Field::Educations) => Some(FieldValue::Contexts(
                m.educations().iter().map(Context::Education).collect(),
            )),
            (Context::Resume(m), Field::SortedTags) => Some(FieldValue::Contexts(
                m.sorted_tags()
                    .iter()
                    .map(|record| Context::Tag {
                        record,
                        importance: None,
                    })
                    .collect(),
            )),
            (Context::Resume(m), Field::Meta) => m
                .meta()
                .map(|meta| FieldValue::Contexts(vec![Context::Meta(meta)])),

            (Context::Job(job), Field::Company) => Some(text(&job.company)),
            (Context::Job(job), Field::Alias) => job.alias.as_deref().map(text),
            (Context::Job(job), Field::Title) => Some(text(&job.title)),
            (Context::Job(job), Field::Time) => Some(text(&job.time)),
            (Context::Job(job), Field::Projects) => Some(FieldValue::Contexts(
                job.projects.iter().map(Context::CompanyProject).collect(),
            )),

            (Context::CompanyProject(p), Field::CompanyProject) => Some(text(&p.parent)),
            (Context::CompanyProject(p), Field::Title) => p.title.as_deref().map(text),

            (Context::PersonalProject(p), Field::PersonalProject | Field::Title) => {
                Some(text(&p.title))
            }

            (Context::Education(e), Field::Education) => Some(text(&e.name)),
            (Context::Education(e), Field::Location) => Some(text(&e.location)),
            (Context::Education(e), Field::Degree) => Some(text(&e.degree)),
            (Context::Education(e), Field::Majors) => Some(FieldValue::Texts(&e.majors)),
            (Context::Education(e), Field::Minors) => Some(FieldValue::Texts(&e.minors)),
            (Context::Education(e), Field::Gpa) => Some(text(&e.gpa)),
            (Context::Education(e), Field::Accolades) => Some(FieldValue::Texts(&e.accolades)),

            (Context::Meta(_), Field::Named(name)) => self.meta_entry(name),

            (Context::Tag { record, .. }, Field::Title) => Some(text(&record.title)),
            (Context::Tag { record, .. }, Field::Id) => Some(text(&record.id)),
            (Context::Tag { record, .. }, Field::Aliases) => Some(FieldValue::Texts(&record.aliases)),
            (Context::Tag { record, .. }, Field::Uses) => {
                Some(FieldValue::Text(Cow::Owned(record.uses.to_string())))
            }

            (Context::Description(d), Field::Text) => Some(FieldValue::Markup(&d.text)),
            (Context::Description(d), Field::Length) => {
                Some(FieldValue::Text(Cow::Owned(d.length.to_string())))
            }

            (ctx, Field::Importance) => ctx
                .importance()
                .map(|i| FieldValue::Text(Cow::Owned(i.to_string()))),
            (ctx, Field::Tags) if ctx.has_tags() => Some(FieldValue::Contexts(
                ctx.entity_tags()
                    .iter()
                    .filter_map(|tag_ref| tag_context(tag_ref, model))
                    .collect(),
            )),
            (ctx, Field::Descs) if ctx.has_descriptions() => Some(FieldValue::Contexts(
                ctx.entity_descriptions()
                    .iter()
                    .map(Context::Description)
                    .collect(),
            )),

            _ => None,
        }
    }

    /// Reads the value a template marker binds to.
    ///
    /// Meta keys are free-form, so a meta block answers by the marker's own
    /// name first; `location` or `title` in a header bind even though those
    /// names also resolve to entity fields.
    pub fn bind(&self, marker: &str, field: &Field, model: &'a ResumeModel) -> Option<FieldValue<'a>> {
        match self {
            Context::Meta(_) => self.meta_entry(marker).or_else(|| self.field(field, model)),
            _ => self.field(field, model),
        }
    }

    /// A meta link or plain field by name.
    fn meta_entry(&self, name: &str) -> Option<FieldValue<'a>> {
        let Context::Meta(meta) = *self else {
            return None;
        };
        meta.links
            .get(name)
            .map(|url| FieldValue::Link(url))
            .or_else(|| meta.fields.get(name).map(|value| text(value)))
    }

    /// Short human label, used when a list of contexts is rendered inline.
    pub fn label(&self) -> &'a str {
        match *self {
            Context::Resume(_) => "",
            Context::Job(job) => &job.company,
            Context::CompanyProject(p) => p.title.as_deref().unwrap_or(&p.parent),
            Context::PersonalProject(p) => &p.title,
            Context::Education(e) => &e.name,
            Context::Meta(_) => "",
            Context::Tag { record, .. } => &record.title,
            Context::Description(d) => &d.text,
        }
    }

    pub fn is_meta(&self) -> bool {
        matches!(self, Context::Meta(_))
    }

    /// Whether the context is a kind that carries a tag list.
    pub fn has_tags(&self) -> bool {
        matches!(
            self,
            Context::Job(_)
                | Context::CompanyProject(_)
                | Context::PersonalProject(_)
                | Context::Description(_)
        )
    }

    /// Whether the context is a kind that carries descriptions.
    pub fn has_descriptions(&self) -> bool {
        matches!(
            self,
            Context::Job(_)
                | Context::CompanyProject(_)
                | Context::PersonalProject(_)
                | Context::Meta(_)
        )
    }

    pub fn has_projects(&self) -> bool {
        matches!(self, Context::Job(_))
    }
}

impl<'a> Context<'a> {
    /// The context's bound tags, borrowed from the model.
    pub fn entity_tags(&self) -> &'a [TagRef] {
        match *self {
            Context::Job(e) => &e.tags,
            Context::CompanyProject(e) => &e.tags,
            Context::PersonalProject(e) => &e.tags,
            Context::Description(e) => &e.tags,
            Context::Resume(_) | Context::Education(_) | Context::Meta(_) | Context::Tag { .. } => {
                &[]
            }
        }
    }

    /// The context's descriptions, borrowed from the model. A description
    /// context yields itself.
    pub fn entity_descriptions(&self) -> &'a [Description] {
        match *self {
            Context::Job(e) => &e.descriptions,
            Context::CompanyProject(e) => &e.descriptions,
            Context::PersonalProject(e) => &e.descriptions,
            Context::Meta(e) => &e.descriptions,
            Context::Description(e) => std::slice::from_ref(e),
            Context::Resume(_) | Context::Education(_) | Context::Tag { .. } => &[],
        }
    }

    pub fn entity_projects(&self) -> &'a [CompanyProject] {
        match *self {
            Context::Job(e) => &e.projects,
            _ => &[],
        }
    }
}

impl Entity for Context<'_> {
    fn tags(&self) -> &[TagRef] {
        self.entity_tags()
    }

    fn descriptions(&self) -> &[Description] {
        self.entity_descriptions()
    }

    fn projects(&self) -> &[CompanyProject] {
        self.entity_projects()
    }

    fn importance(&self) -> Option<i64> {
        match *self {
            Context::Job(e) => e.importance,
            Context::CompanyProject(e) => e.importance,
            Context::PersonalProject(e) => e.importance,
            Context::Education(e) => e.importance,
            Context::Description(e) => Some(e.importance),
            Context::Tag { importance, .. } => importance,
            Context::Resume(_) | Context::Meta(_) => None,
        }
    }
}

fn text(value: &str) -> FieldValue<'_> {
    FieldValue::Text(Cow::Borrowed(value))
}

fn tag_context<'a>(tag_ref: &TagRef, model: &'a ResumeModel) -> Option<Context<'a>> {
    model.tag(&tag_ref.id).map(|record| Context::Tag {
        record,
        importance: Some(tag_ref.importance),
    })
}
