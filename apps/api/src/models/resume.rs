#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::resume::tags::{TagRecord, TagRegistry};

/// Importance given to tags and descriptions that do not declare one.
pub const DEFAULT_IMPORTANCE: i64 = 50;
/// Entities at or below this importance are hidden in the default view.
pub const MINIMUM_IMPORTANCE: i64 = 30;

/// An entity's or description's bound reference to a canonical tag.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TagRef {
    pub id: String,
    pub importance: i64,
}

/// One candidate blurb for an entity.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Description {
    /// Text after inline formatting.
    pub text: String,
    pub tags: Vec<TagRef>,
    pub importance: i64,
    /// Character count of the formatted text.
    pub length: usize,
}

impl Description {
    pub fn new(text: String, tags: Vec<TagRef>, importance: i64) -> Self {
        let length = text.chars().count();
        Self {
            text,
            tags,
            importance,
            length,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub title: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<i64>,
    pub tags: Vec<TagRef>,
    #[serde(rename = "descs")]
    pub descriptions: Vec<Description>,
    pub projects: Vec<CompanyProject>,
}

impl Job {
    /// Key under which the job is stored: the alias when present, else the company.
    pub fn key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.company)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProject {
    /// Company name or alias of the owning job, as written in the document.
    #[serde(rename = "companyProject")]
    pub parent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<i64>,
    pub tags: Vec<TagRef>,
    #[serde(rename = "descs")]
    pub descriptions: Vec<Description>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalProject {
    #[serde(rename = "personalProject")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<i64>,
    pub tags: Vec<TagRef>,
    #[serde(rename = "descs")]
    pub descriptions: Vec<Description>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(rename = "education")]
    pub name: String,
    pub location: String,
    pub degree: String,
    pub majors: Vec<String>,
    pub minors: Vec<String>,
    pub gpa: String,
    pub accolades: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<i64>,
}

/// Contact and headline block. There is at most one per document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Meta {
    /// Plain scalar fields (name, location, ...), rendered as text.
    pub fields: BTreeMap<String, String>,
    /// Fields rendered as hyperlinks (email, profiles).
    pub links: BTreeMap<String, String>,
    #[serde(rename = "descs")]
    pub descriptions: Vec<Description>,
}

/// Capabilities shared by every entity kind.
///
/// Relevance and visibility only ever go through these accessors, so an
/// entity's tags are always its parsed `TagRef` list.
pub trait Entity {
    fn tags(&self) -> &[TagRef] {
        &[]
    }

    fn descriptions(&self) -> &[Description] {
        &[]
    }

    fn projects(&self) -> &[CompanyProject] {
        &[]
    }

    fn importance(&self) -> Option<i64> {
        None
    }
}

impl Entity for Job {
    fn tags(&self) -> &[TagRef] {
        &self.tags
    }

    fn descriptions(&self) -> &[Description] {
        &self.descriptions
    }

    fn projects(&self) -> &[CompanyProject] {
        &self.projects
    }

    fn importance(&self) -> Option<i64> {
        self.importance
    }
}

impl Entity for CompanyProject {
    fn tags(&self) -> &[TagRef] {
        &self.tags
    }

    fn descriptions(&self) -> &[Description] {
        &self.descriptions
    }

    fn importance(&self) -> Option<i64> {
        self.importance
    }
}

impl Entity for PersonalProject {
    fn tags(&self) -> &[TagRef] {
        &self.tags
    }

    fn descriptions(&self) -> &[Description] {
        &self.descriptions
    }

    fn importance(&self) -> Option<i64> {
        self.importance
    }
}

impl Entity for Education {
    fn importance(&self) -> Option<i64> {
        self.importance
    }
}

impl Entity for Meta {
    fn descriptions(&self) -> &[Description] {
        &self.descriptions
    }
}

/// A description rendered as its own list entry searches its own text.
impl Entity for Description {
    fn tags(&self) -> &[TagRef] {
        &self.tags
    }

    fn descriptions(&self) -> &[Description] {
        std::slice::from_ref(self)
    }

    fn importance(&self) -> Option<i64> {
        Some(self.importance)
    }
}

/// The parsed document. Built once by `parse_document`, read-only afterwards.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeModel {
    pub(crate) companies: Vec<Job>,
    #[serde(skip)]
    pub(crate) company_index: HashMap<String, usize>,
    pub(crate) personal_projects: Vec<PersonalProject>,
    pub(crate) educations: Vec<Education>,
    #[serde(skip)]
    pub(crate) tags: TagRegistry,
    pub(crate) sorted_tags: Vec<TagRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) meta: Option<Meta>,
}

impl ResumeModel {
    /// Jobs in document order.
    pub fn companies(&self) -> &[Job] {
        &self.companies
    }

    /// Looks a job up by its alias, falling back to its company name.
    pub fn company(&self, name: &str) -> Option<&Job> {
        self.company_slot(name).map(|slot| &self.companies[slot])
    }

    pub(crate) fn company_slot(&self, name: &str) -> Option<usize> {
        self.company_index
            .get(name)
            .copied()
            .or_else(|| self.companies.iter().position(|job| job.company == name))
    }

    pub fn personal_projects(&self) -> &[PersonalProject] {
        &self.personal_projects
    }

    pub fn educations(&self) -> &[Education] {
        &self.educations
    }

    pub fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    pub fn tag(&self, id: &str) -> Option<&TagRecord> {
        self.tags.get(id)
    }

    /// All tags, most used first.
    pub fn sorted_tags(&self) -> &[TagRecord] {
        &self.sorted_tags
    }

    pub fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }
}
