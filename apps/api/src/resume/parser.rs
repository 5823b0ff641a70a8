//! Entity Parser: turns normalized document entries into a `ResumeModel`.
//!
//! Entries are handled in document order. Each one is dispatched on the first
//! discriminating field it carries; anything that cannot be placed produces a
//! diagnostic and is skipped, never failing the whole document.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::document::raw::{
    scalar_to_text, RawCompanyProject, RawDescription, RawEducation, RawJob, RawMeta,
    RawPersonalProject, RawTag, RawTagDeclaration,
};
use crate::models::resume::{
    CompanyProject, Description, Education, Job, Meta, PersonalProject, ResumeModel, TagRef,
    DEFAULT_IMPORTANCE,
};
use crate::resume::diagnostics::{Diagnostic, Diagnostics};
use crate::resume::format::format_inline;
use crate::resume::tags::TagRegistry;

/// Meta fields rendered as hyperlinks unless configured otherwise.
pub const DEFAULT_LINKED_META_FIELDS: &[&str] = &["linkedIn", "gitHub", "email"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Job,
    CompanyProject,
    PersonalProject,
    Education,
    TagDeclaration,
    Meta,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Job => "company",
            EntryKind::CompanyProject => "company_project",
            EntryKind::PersonalProject => "personal_project",
            EntryKind::Education => "education",
            EntryKind::TagDeclaration => "tag",
            EntryKind::Meta => "meta",
        }
    }
}

/// Discriminating fields in priority order. The first one present wins.
const DISCRIMINATORS: [(&str, EntryKind); 6] = [
    ("company", EntryKind::Job),
    ("companyProject", EntryKind::CompanyProject),
    ("personalProject", EntryKind::PersonalProject),
    ("education", EntryKind::Education),
    ("tag", EntryKind::TagDeclaration),
    ("meta", EntryKind::Meta),
];

/// Returns the entry kind selected by the first discriminator present.
pub fn classify(entry: &Map<String, Value>) -> Option<EntryKind> {
    DISCRIMINATORS
        .iter()
        .find(|(field, _)| entry.contains_key(*field))
        .map(|(_, kind)| *kind)
}

#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Meta fields stored as links rather than plain text.
    pub linked_meta_fields: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            linked_meta_fields: DEFAULT_LINKED_META_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }
}

/// A finished model plus everything that was dropped on the way.
#[derive(Debug)]
pub struct ParsedDocument {
    pub model: ResumeModel,
    pub diagnostics: Diagnostics,
}

/// Parses every entry and finalizes the tag ordering.
pub fn parse_document(entries: Vec<Value>, options: &ParseOptions) -> ParsedDocument {
    let mut builder = ResumeBuilder::new(options);
    for (index, entry) in entries.into_iter().enumerate() {
        builder.parse_entry(index, entry);
    }
    builder.finish()
}

/// Parses raw tag references, registering each one.
pub fn parse_tag_list(registry: &mut TagRegistry, raw: &[RawTag]) -> Vec<TagRef> {
    raw.iter()
        .map(|tag| {
            let (text, importance) = match tag {
                RawTag::Plain(text) => (text.as_str(), DEFAULT_IMPORTANCE),
                RawTag::Weighted(text, importance) => (text.as_str(), *importance),
            };
            let record = registry.register(text, &[]);
            TagRef {
                id: record.id.clone(),
                importance,
            }
        })
        .collect()
}

/// Parses descriptions, formatting their text. The result is ordered by
/// ascending importance; equal importances keep document order.
pub fn parse_description_list(
    registry: &mut TagRegistry,
    raw: &[RawDescription],
) -> Vec<Description> {
    let mut descriptions: Vec<Description> = raw
        .iter()
        .map(|desc| match desc {
            RawDescription::Plain(text) => {
                Description::new(format_inline(text), Vec::new(), DEFAULT_IMPORTANCE)
            }
            RawDescription::Detailed {
                text,
                tags,
                importance,
            } => Description::new(
                format_inline(text),
                parse_tag_list(registry, tags),
                importance.unwrap_or(DEFAULT_IMPORTANCE),
            ),
        })
        .collect();
    descriptions.sort_by_key(|d| d.importance);
    descriptions
}

/// Accumulates entities into a model during one parse pass.
pub struct ResumeBuilder<'a> {
    model: ResumeModel,
    diagnostics: Diagnostics,
    options: &'a ParseOptions,
}

impl<'a> ResumeBuilder<'a> {
    pub fn new(options: &'a ParseOptions) -> Self {
        Self {
            model: ResumeModel::default(),
            diagnostics: Diagnostics::new(),
            options,
        }
    }

    pub fn parse_entry(&mut self, index: usize, entry: Value) {
        let Value::Object(map) = entry else {
            self.diagnostics.emit(Diagnostic::UnrecognizedEntry {
                index,
                fields: String::new(),
            });
            return;
        };

        let Some(kind) = classify(&map) else {
            let fields = map.keys().cloned().collect::<Vec<_>>().join(", ");
            self.diagnostics
                .emit(Diagnostic::UnrecognizedEntry { index, fields });
            return;
        };

        debug!(index, kind = kind.as_str(), "parsing resume entry");
        let entry = Value::Object(map);
        match kind {
            EntryKind::Job => {
                if let Some(raw) = self.read(index, kind, entry) {
                    self.parse_job(index, raw);
                }
            }
            EntryKind::CompanyProject => {
                if let Some(raw) = self.read(index, kind, entry) {
                    self.parse_company_project(index, raw);
                }
            }
            EntryKind::PersonalProject => {
                if let Some(raw) = self.read(index, kind, entry) {
                    self.parse_personal_project(index, raw);
                }
            }
            EntryKind::Education => {
                if let Some(raw) = self.read(index, kind, entry) {
                    self.parse_education(raw);
                }
            }
            EntryKind::TagDeclaration => {
                if let Some(raw) = self.read(index, kind, entry) {
                    self.parse_tag_declaration(raw);
                }
            }
            EntryKind::Meta => {
                if let Some(raw) = self.read::<RawMeta>(index, kind, entry) {
                    self.parse_meta(index, raw.meta);
                }
            }
        }
    }

    fn read<T: DeserializeOwned>(&mut self, index: usize, kind: EntryKind, entry: Value) -> Option<T> {
        match serde_json::from_value(entry) {
            Ok(raw) => Some(raw),
            Err(e) => {
                self.diagnostics.emit(Diagnostic::MalformedEntry {
                    index,
                    kind: kind.as_str(),
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    /// Decodes list items one at a time. A malformed item is reported and
    /// skipped; the rest of the list and its entity are kept.
    fn read_items<T: DeserializeOwned>(
        &mut self,
        index: usize,
        kind: EntryKind,
        field: &str,
        items: Vec<Value>,
    ) -> Vec<T> {
        items
            .into_iter()
            .enumerate()
            .filter_map(|(position, item)| match serde_json::from_value(item) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    self.diagnostics.emit(Diagnostic::MalformedEntry {
                        index,
                        kind: kind.as_str(),
                        reason: format!("{field}[{position}]: {e}"),
                    });
                    None
                }
            })
            .collect()
    }

    /// Decodes and registers an entity's tag and description lists.
    fn read_lists(
        &mut self,
        index: usize,
        kind: EntryKind,
        tags: Vec<Value>,
        descs: Vec<Value>,
    ) -> (Vec<TagRef>, Vec<Description>) {
        let tags: Vec<RawTag> = self.read_items(index, kind, "tags", tags);
        let descs: Vec<RawDescription> = self.read_items(index, kind, "descs", descs);
        (
            parse_tag_list(&mut self.model.tags, &tags),
            parse_description_list(&mut self.model.tags, &descs),
        )
    }

    pub fn parse_job(&mut self, index: usize, raw: RawJob) {
        let (tags, descriptions) = self.read_lists(index, EntryKind::Job, raw.tags, raw.descs);
        let job = Job {
            tags,
            descriptions,
            company: raw.company,
            alias: raw.alias,
            title: raw.title,
            time: raw.time,
            importance: raw.importance,
            projects: Vec::new(),
        };

        let key = job.key().to_string();
        match self.model.company_index.get(&key).copied() {
            Some(slot) => {
                debug!(key = %key, "job redeclared; replacing earlier entry");
                self.model.companies[slot] = job;
            }
            None => {
                self.model
                    .company_index
                    .insert(key, self.model.companies.len());
                self.model.companies.push(job);
            }
        }
    }

    /// Attaches a project to its job. Projects naming an unknown job are dropped.
    pub fn parse_company_project(&mut self, index: usize, raw: RawCompanyProject) {
        let Some(slot) = self.model.company_slot(&raw.company_project) else {
            self.diagnostics.emit(Diagnostic::UnresolvedParent {
                parent: raw.company_project,
            });
            return;
        };

        let (tags, descriptions) =
            self.read_lists(index, EntryKind::CompanyProject, raw.tags, raw.descs);
        let project = CompanyProject {
            tags,
            descriptions,
            parent: raw.company_project,
            title: raw.title,
            importance: raw.importance,
        };
        self.model.companies[slot].projects.push(project);
    }

    pub fn parse_personal_project(&mut self, index: usize, raw: RawPersonalProject) {
        let (tags, descriptions) =
            self.read_lists(index, EntryKind::PersonalProject, raw.tags, raw.descs);
        let project = PersonalProject {
            tags,
            descriptions,
            title: raw.personal_project,
            importance: raw.importance,
        };
        self.model.personal_projects.push(project);
    }

    pub fn parse_education(&mut self, raw: RawEducation) {
        self.model.educations.push(Education {
            name: raw.education,
            location: raw.location,
            degree: raw.degree,
            majors: raw.majors,
            minors: raw.minors,
            gpa: raw.gpa,
            accolades: raw.accolades,
            importance: raw.importance,
        });
    }

    pub fn parse_tag_declaration(&mut self, raw: RawTagDeclaration) {
        self.model.tags.register(&raw.tag, &raw.aliases);
    }

    /// Splits the meta block into links, plain fields and descriptions.
    /// A later meta block replaces an earlier one.
    pub fn parse_meta(&mut self, index: usize, mut raw: Map<String, Value>) {
        let mut meta = Meta::default();

        if let Some(descs) = raw.remove("descs") {
            let items = match descs {
                Value::Array(items) => items,
                Value::Null => Vec::new(),
                other => vec![other],
            };
            let descs: Vec<RawDescription> = self.read_items(index, EntryKind::Meta, "descs", items);
            meta.descriptions = parse_description_list(&mut self.model.tags, &descs);
        }

        for (field, value) in raw {
            let Some(text) = scalar_to_text(&value) else {
                debug!(field = %field, "skipping non-scalar meta field");
                continue;
            };
            if self.options.linked_meta_fields.iter().any(|f| *f == field) {
                meta.links.insert(field, text);
            } else {
                meta.fields.insert(field, text);
            }
        }

        self.model.meta = Some(meta);
    }

    pub fn finish(mut self) -> ParsedDocument {
        self.model.sorted_tags = self.model.tags.sorted_by_uses();
        info!(
            companies = self.model.companies.len(),
            personal_projects = self.model.personal_projects.len(),
            educations = self.model.educations.len(),
            tags = self.model.tags.len(),
            diagnostics = self.diagnostics.len(),
            "resume parsed"
        );
        ParsedDocument {
            model: self.model,
            diagnostics: self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(entries: Value) -> ParsedDocument {
        let Value::Array(entries) = entries else {
            panic!("test documents are arrays");
        };
        parse_document(entries, &ParseOptions::default())
    }

    #[test]
    fn test_tag_list_defaults_importance() {
        let mut registry = TagRegistry::new();
        let tags = parse_tag_list(
            &mut registry,
            &[
                RawTag::Plain("Rust".to_string()),
                RawTag::Weighted("Go".to_string(), 80),
            ],
        );
        assert_eq!(tags[0], TagRef { id: "rust".to_string(), importance: 50 });
        assert_eq!(tags[1], TagRef { id: "go".to_string(), importance: 80 });
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_descriptions_sorted_by_importance_stably() {
        let mut registry = TagRegistry::new();
        let descs = parse_description_list(
            &mut registry,
            &[
                RawDescription::Detailed {
                    text: "high".to_string(),
                    tags: vec![],
                    importance: Some(90),
                },
                RawDescription::Plain("first default".to_string()),
                RawDescription::Detailed {
                    text: "low".to_string(),
                    tags: vec![],
                    importance: Some(10),
                },
                RawDescription::Plain("second default".to_string()),
            ],
        );
        let texts: Vec<_> = descs.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["low", "first default", "second default", "high"]);
    }

    #[test]
    fn test_description_text_is_formatted_before_measuring() {
        let mut registry = TagRegistry::new();
        let descs = parse_description_list(&mut registry, &[RawDescription::Plain("*x*".to_string())]);
        assert_eq!(descs[0].text, "<b>x</b>");
        assert_eq!(descs[0].length, 8);
    }

    #[test]
    fn test_full_document() {
        let parsed = parse(json!([
            { "meta": { "name": "Sam Doe", "email": "sam@example.com", "descs": ["Engineer"] } },
            { "tag": "Rust", "aliases": ["rustlang"] },
            { "company": "Acme Corp", "alias": "acme", "title": "Engineer", "time": "2019-2021",
              "tags": ["Rust", ["Kafka", 70]], "descs": ["Built things"] },
            { "companyProject": "acme", "tags": ["rust"], "descs": [{ "text": "Ported the _pipeline_", "tags": ["Rust"] }] },
            { "personalProject": "Raytracer", "tags": ["Rust"], "descs": ["Weekend renderer"] },
            { "education": "State University", "degree": "BSc", "majors": ["CS"] }
        ]));

        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        let model = parsed.model;
        assert_eq!(model.companies().len(), 1);
        let acme = model.company("acme").unwrap();
        assert_eq!(acme.projects.len(), 1);
        assert_eq!(acme.projects[0].descriptions[0].text, "Ported the <i>pipeline</i>");
        assert_eq!(model.personal_projects().len(), 1);
        assert_eq!(model.educations().len(), 1);

        let rust = model.tag("rust").unwrap();
        assert_eq!(rust.uses, 5, "declaration, job, project, project desc, personal project");
        assert_eq!(rust.aliases, vec!["rustlang"]);
        assert_eq!(model.sorted_tags()[0].id, "rust");

        let meta = model.meta().unwrap();
        assert_eq!(meta.links.get("email").map(String::as_str), Some("sam@example.com"));
        assert_eq!(meta.fields.get("name").map(String::as_str), Some("Sam Doe"));
        assert_eq!(meta.descriptions.len(), 1);
    }

    #[test]
    fn test_company_project_resolves_by_company_name() {
        let parsed = parse(json!([
            { "company": "Acme Corp", "alias": "acme" },
            { "companyProject": "Acme Corp", "descs": ["x"] }
        ]));
        assert_eq!(parsed.model.company("acme").unwrap().projects.len(), 1);
    }

    #[test]
    fn test_unresolved_company_project_is_dropped() {
        let parsed = parse(json!([
            { "companyProject": "Initech", "tags": ["Cobol"] },
            { "company": "Initech" }
        ]));
        assert_eq!(
            parsed.diagnostics.iter().next(),
            Some(&Diagnostic::UnresolvedParent { parent: "Initech".to_string() })
        );
        assert!(parsed.model.company("Initech").unwrap().projects.is_empty(), "no retry later");
        assert!(parsed.model.tag("cobol").is_none(), "dropped project registers no tags");
    }

    #[test]
    fn test_unrecognized_entry_is_skipped() {
        let parsed = parse(json!([{ "hobby": "chess" }, "loose string", { "company": "Acme" }]));
        assert_eq!(parsed.diagnostics.len(), 2);
        assert_eq!(parsed.model.companies().len(), 1);
    }

    #[test]
    fn test_first_discriminator_wins() {
        let parsed = parse(json!([{ "company": "Acme", "education": "State U" }]));
        assert_eq!(parsed.model.companies().len(), 1);
        assert!(parsed.model.educations().is_empty());
    }

    #[test]
    fn test_malformed_entry_reports_kind() {
        let parsed = parse(json!([{ "company": ["not", "a", "name"] }]));
        match parsed.diagnostics.iter().next() {
            Some(Diagnostic::MalformedEntry { index, kind, .. }) => {
                assert_eq!(*index, 0);
                assert_eq!(*kind, "company");
            }
            other => panic!("expected malformed entry, got {other:?}"),
        };
    }

    #[test]
    fn test_sorted_tags_ties_keep_insertion_order() {
        let parsed = parse(json!([
            { "personalProject": "p1", "tags": ["a", "a", "a", "b", "c", "c", "c"] }
        ]));
        let ids: Vec<_> = parsed.model.sorted_tags().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_redeclared_job_replaces_in_place() {
        let parsed = parse(json!([
            { "company": "Acme", "title": "Intern" },
            { "company": "Globex" },
            { "company": "Acme", "title": "Engineer" }
        ]));
        let titles: Vec<_> = parsed.model.companies().iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["Engineer", ""]);
    }

    #[test]
    fn test_bad_tag_item_keeps_its_job() {
        let parsed = parse(json!([
            { "company": "Acme", "tags": ["Java", ["Go", 7.5], 8], "descs": ["Built things"] },
            { "companyProject": "Acme", "descs": ["Ported the pipeline"] }
        ]));

        let diagnostics: Vec<_> = parsed.diagnostics.iter().collect();
        assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
        match diagnostics[0] {
            Diagnostic::MalformedEntry { index, kind, reason } => {
                assert_eq!(*index, 0);
                assert_eq!(*kind, "company");
                assert!(reason.starts_with("tags[1]"), "reason names the item: {reason}");
            }
            other => panic!("expected malformed entry, got {other:?}"),
        }

        let acme = parsed.model.company("Acme").expect("job survives a bad tag");
        let ids: Vec<_> = acme.tags.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["java", "8"]);
        assert_eq!(acme.descriptions.len(), 1);
        assert_eq!(acme.projects.len(), 1, "project still resolves its parent");
    }

    #[test]
    fn test_bad_description_item_is_skipped() {
        let parsed = parse(json!([
            { "personalProject": "Raytracer", "descs": ["Renderer", { "tags": ["Rust"] }, "Shaders"] },
            { "meta": { "name": "Sam", "descs": ["Engineer", ["not", "a", "desc"]] } }
        ]));

        assert_eq!(parsed.diagnostics.len(), 2);
        let project = &parsed.model.personal_projects()[0];
        let texts: Vec<_> = project.descriptions.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["Renderer", "Shaders"]);
        let meta = parsed.model.meta().expect("meta kept");
        assert_eq!(meta.descriptions.len(), 1);
        assert_eq!(meta.fields.get("name").map(String::as_str), Some("Sam"));
    }
}
