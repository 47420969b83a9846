//! Resource descriptors.
//!
//! Each CRUD-managed entity on the backend is described once by a static
//! [`ResourceDescriptor`]: where it lives, which fields it has, how its
//! payloads are encoded, and how its dashboard routes are named. The
//! generic List / Detail / Form views are driven entirely by these tables.

use crate::error::CoreError;
use crate::locale::{split_localized, Locale};

/// Every resource managed through the generic CRUD views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    CareerRequirement,
    ContactAddress,
    ContactMail,
    ContactNumber,
    Gallery,
    Press,
    Project,
    Reference,
    Slider,
    ProjectType,
    Location,
}

/// How a single field is edited and transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain single-line text.
    Text,
    /// Raw markup produced by the rich-text editor.
    RichText,
    /// Calendar date, edited as `YYYY-MM-DD`.
    Date,
    /// Whole number entered as text.
    Integer,
    /// Identifier of a row of another resource, picked from a select.
    ForeignKey(ResourceKind),
    /// Uploaded file referenced back by a server-relative path.
    ///
    /// When `resend_existing` is set, an update without a replacement file
    /// sends the stored path as a text part so the field is always present.
    File { resend_existing: bool },
    /// Repeatable organizer sub-records (see [`crate::organizers`]).
    Organizers,
}

/// One field of a resource's schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire name, used both in JSON bodies and multipart part names.
    pub name: &'static str,
    pub kind: FieldKind,
    /// Must be non-empty before a submit is attempted.
    pub required: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind, required: bool) -> Self {
        Self {
            name,
            kind,
            required,
        }
    }

    /// Locale of a locale-triple field, `None` for language-neutral fields.
    pub fn locale(&self) -> Option<Locale> {
        split_localized(self.name).map(|(_, locale)| locale)
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, FieldKind::File { .. })
    }
}

/// Request body encoding for create and update calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Multipart,
}

/// Shape of the `GET {endpoint}/{id}` response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailShape {
    /// A single JSON object.
    Object,
    /// A JSON array whose first element is the record.
    ArrayFirst,
}

/// Static description of one CRUD resource.
#[derive(Debug)]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,
    /// Singular display name.
    pub name: &'static str,
    /// REST collection path below `/api/`.
    pub endpoint: &'static str,
    /// Dashboard route segment below `/admin/`.
    pub route_segment: &'static str,
    /// Noun used in `add-{noun}`, `edit-{noun}`, `view-{noun}` routes.
    pub route_noun: &'static str,
    /// Whether a read-only Detail view exists. Edits of resources without
    /// one return to the List view.
    pub has_detail: bool,
    pub detail_shape: DetailShape,
    pub fields: &'static [FieldSpec],
    /// Fields joined to label this resource's rows in reference selects
    /// and list rows.
    pub label_fields: &'static [&'static str],
}

/// Descriptors are singletons; identity is the kind.
impl PartialEq for ResourceDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for ResourceDescriptor {}

use FieldKind::*;

const fn text(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, Text, true)
}

const fn rich(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, RichText, false)
}

const fn date(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, Date, true)
}

const fn integer(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, Integer, true)
}

const fn foreign(name: &'static str, target: ResourceKind) -> FieldSpec {
    FieldSpec::new(name, ForeignKey(target), true)
}

const fn file(name: &'static str, resend_existing: bool) -> FieldSpec {
    FieldSpec::new(name, File { resend_existing }, true)
}

static CAREER_REQUIREMENT: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::CareerRequirement,
    name: "career requirement",
    endpoint: "career-req",
    route_segment: "career-requirements",
    route_noun: "career-req",
    has_detail: true,
    detail_shape: DetailShape::Object,
    fields: &[
        text("career_req_tk"),
        text("career_req_en"),
        text("career_req_ru"),
        rich("tk"),
        rich("en"),
        rich("ru"),
    ],
    label_fields: &["career_req_en", "career_req_tk", "career_req_ru"],
};

static CONTACT_ADDRESS: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::ContactAddress,
    name: "contact address",
    endpoint: "contact-address",
    route_segment: "contact-address",
    route_noun: "location",
    has_detail: false,
    detail_shape: DetailShape::Object,
    fields: &[
        text("address_tk"),
        text("address_en"),
        text("address_ru"),
        text("location_tk"),
        text("location_en"),
        text("location_ru"),
        FieldSpec::new("iframe_code", RichText, false),
    ],
    label_fields: &["location_en", "location_tk", "location_ru"],
};

static CONTACT_MAIL: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::ContactMail,
    name: "contact mail",
    endpoint: "contact-mails",
    route_segment: "contact-mails",
    route_noun: "mail",
    has_detail: false,
    detail_shape: DetailShape::Object,
    fields: &[
        text("mail"),
        foreign("location_id", ResourceKind::ContactAddress),
    ],
    label_fields: &["mail"],
};

static CONTACT_NUMBER: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::ContactNumber,
    name: "contact number",
    endpoint: "contact-numbers",
    route_segment: "contact-numbers",
    route_noun: "number",
    has_detail: false,
    detail_shape: DetailShape::Object,
    fields: &[
        text("number"),
        foreign("location_id", ResourceKind::ContactAddress),
    ],
    label_fields: &["number"],
};

static GALLERY: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Gallery,
    name: "gallery image",
    endpoint: "gallery",
    route_segment: "gallery",
    route_noun: "gallery",
    has_detail: true,
    detail_shape: DetailShape::Object,
    fields: &[
        file("image", false),
        foreign("project_id", ResourceKind::Project),
    ],
    label_fields: &["en", "tk", "ru"],
};

static PRESS: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Press,
    name: "press item",
    endpoint: "press",
    route_segment: "press",
    route_noun: "press",
    has_detail: true,
    detail_shape: DetailShape::Object,
    fields: &[
        file("image", false),
        rich("tk"),
        rich("en"),
        rich("ru"),
        rich("text_tk"),
        rich("text_en"),
        rich("text_ru"),
    ],
    label_fields: &["en", "tk", "ru"],
};

static PROJECT: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Project,
    name: "project",
    endpoint: "projects",
    route_segment: "projects",
    route_noun: "project",
    has_detail: true,
    detail_shape: DetailShape::Object,
    fields: &[
        file("image", true),
        file("logo", false),
        rich("tk"),
        rich("en"),
        rich("ru"),
        rich("text_tk"),
        rich("text_en"),
        rich("text_ru"),
        date("date"),
        date("end_date"),
        text("link"),
        foreign("location_id", ResourceKind::Location),
        foreign("type_id", ResourceKind::ProjectType),
        integer("speakers"),
        integer("delegates"),
        integer("countries"),
        integer("companies"),
        integer("media"),
        FieldSpec::new("organizers", Organizers, false),
    ],
    label_fields: &["en", "tk", "ru"],
};

static REFERENCE: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Reference,
    name: "reference",
    endpoint: "references",
    route_segment: "reference",
    route_noun: "reference",
    has_detail: true,
    detail_shape: DetailShape::Object,
    fields: &[
        file("file", false),
        text("name_tk"),
        text("name_en"),
        text("name_ru"),
        date("date"),
    ],
    label_fields: &["name_en", "name_tk", "name_ru"],
};

static SLIDER: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Slider,
    name: "slider",
    endpoint: "sliders",
    route_segment: "sliders",
    route_noun: "slider",
    has_detail: true,
    detail_shape: DetailShape::Object,
    fields: &[file("image", false), rich("tk"), rich("en"), rich("ru")],
    label_fields: &["en", "tk", "ru"],
};

static PROJECT_TYPE: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::ProjectType,
    name: "project type",
    endpoint: "types",
    route_segment: "types",
    route_noun: "type",
    has_detail: false,
    detail_shape: DetailShape::ArrayFirst,
    fields: &[text("type_tk"), text("type_en"), text("type_ru")],
    label_fields: &["type_en", "type_tk", "type_ru"],
};

static LOCATION: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Location,
    name: "location",
    endpoint: "locations",
    route_segment: "locations",
    route_noun: "location",
    has_detail: false,
    detail_shape: DetailShape::Object,
    fields: &[
        text("location_tk"),
        text("location_en"),
        text("location_ru"),
    ],
    label_fields: &["location_en", "location_tk", "location_ru"],
};

impl ResourceKind {
    /// All resource kinds, in sidebar order.
    pub fn all() -> &'static [ResourceKind] {
        &[
            ResourceKind::Project,
            ResourceKind::Press,
            ResourceKind::Gallery,
            ResourceKind::Reference,
            ResourceKind::Slider,
            ResourceKind::CareerRequirement,
            ResourceKind::ContactAddress,
            ResourceKind::ContactMail,
            ResourceKind::ContactNumber,
            ResourceKind::ProjectType,
            ResourceKind::Location,
        ]
    }

    pub fn descriptor(self) -> &'static ResourceDescriptor {
        match self {
            ResourceKind::CareerRequirement => &CAREER_REQUIREMENT,
            ResourceKind::ContactAddress => &CONTACT_ADDRESS,
            ResourceKind::ContactMail => &CONTACT_MAIL,
            ResourceKind::ContactNumber => &CONTACT_NUMBER,
            ResourceKind::Gallery => &GALLERY,
            ResourceKind::Press => &PRESS,
            ResourceKind::Project => &PROJECT,
            ResourceKind::Reference => &REFERENCE,
            ResourceKind::Slider => &SLIDER,
            ResourceKind::ProjectType => &PROJECT_TYPE,
            ResourceKind::Location => &LOCATION,
        }
    }

    /// Resolve a resource by its REST endpoint or its dashboard route
    /// segment (`"references"` and `"reference"` both resolve).
    pub fn from_slug(slug: &str) -> Result<ResourceKind, CoreError> {
        let slug = slug.trim().trim_matches('/');
        Self::all()
            .iter()
            .copied()
            .find(|kind| {
                let d = kind.descriptor();
                d.endpoint == slug || d.route_segment == slug
            })
            .ok_or_else(|| CoreError::UnknownResource(slug.to_string()))
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.descriptor().endpoint)
    }
}

impl ResourceDescriptor {
    /// Multipart when any field carries a file or the organizer group.
    pub fn encoding(&self) -> Encoding {
        let needs_multipart = self
            .fields
            .iter()
            .any(|f| matches!(f.kind, File { .. } | Organizers));
        if needs_multipart {
            Encoding::Multipart
        } else {
            Encoding::Json
        }
    }

    pub fn field(&self, name: &str) -> Result<&'static FieldSpec, CoreError> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| CoreError::UnknownField {
                resource: self.endpoint,
                field: name.to_string(),
            })
    }

    /// Resources whose rows populate this resource's foreign-key selects,
    /// deduplicated, in field order.
    pub fn reference_dependencies(&self) -> Vec<ResourceKind> {
        let mut deps = Vec::new();
        for field in self.fields {
            if let ForeignKey(target) = field.kind {
                if !deps.contains(&target) {
                    deps.push(target);
                }
            }
        }
        deps
    }

    pub fn has_organizers(&self) -> bool {
        self.fields.iter().any(|f| f.kind == Organizers)
    }

    /// Fields of the given locale, in schema order.
    pub fn locale_fields(&self, locale: Locale) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields
            .iter()
            .filter(move |f| f.locale() == Some(locale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn endpoints_are_unique() {
        let endpoints: HashSet<_> = ResourceKind::all()
            .iter()
            .map(|k| k.descriptor().endpoint)
            .collect();
        assert_eq!(endpoints.len(), ResourceKind::all().len());
    }

    #[test]
    fn descriptor_kind_matches() {
        for kind in ResourceKind::all() {
            assert_eq!(kind.descriptor().kind, *kind);
        }
    }

    #[test]
    fn text_only_resources_use_json() {
        assert_eq!(ResourceKind::ContactMail.descriptor().encoding(), Encoding::Json);
        assert_eq!(ResourceKind::ProjectType.descriptor().encoding(), Encoding::Json);
        assert_eq!(
            ResourceKind::CareerRequirement.descriptor().encoding(),
            Encoding::Json
        );
    }

    #[test]
    fn file_resources_use_multipart() {
        assert_eq!(ResourceKind::Project.descriptor().encoding(), Encoding::Multipart);
        assert_eq!(ResourceKind::Gallery.descriptor().encoding(), Encoding::Multipart);
        assert_eq!(ResourceKind::Reference.descriptor().encoding(), Encoding::Multipart);
    }

    #[test]
    fn locale_triples_are_complete() {
        for kind in ResourceKind::all() {
            let d = kind.descriptor();
            let counts: Vec<usize> = Locale::all()
                .iter()
                .map(|l| d.locale_fields(*l).count())
                .collect();
            assert!(
                counts.windows(2).all(|w| w[0] == w[1]),
                "{} has an incomplete locale triple: {counts:?}",
                d.endpoint
            );
        }
    }

    #[test]
    fn project_dependencies() {
        assert_eq!(
            ResourceKind::Project.descriptor().reference_dependencies(),
            vec![ResourceKind::Location, ResourceKind::ProjectType]
        );
    }

    #[test]
    fn from_slug_accepts_endpoint_and_route_segment() {
        assert_eq!(ResourceKind::from_slug("references").unwrap(), ResourceKind::Reference);
        assert_eq!(ResourceKind::from_slug("reference").unwrap(), ResourceKind::Reference);
        assert_eq!(
            ResourceKind::from_slug("career-requirements").unwrap(),
            ResourceKind::CareerRequirement
        );
        assert!(ResourceKind::from_slug("widgets").is_err());
    }

    #[test]
    fn only_project_image_resends_stored_path() {
        let resending: Vec<(&str, &str)> = ResourceKind::all()
            .iter()
            .flat_map(|k| {
                let d = k.descriptor();
                d.fields.iter().filter_map(move |f| match f.kind {
                    File {
                        resend_existing: true,
                    } => Some((d.endpoint, f.name)),
                    _ => None,
                })
            })
            .collect();
        assert_eq!(resending, vec![("projects", "image")]);
    }

    #[test]
    fn unknown_field_is_reported() {
        let err = ResourceKind::Press.descriptor().field("nope").unwrap_err();
        assert_eq!(err.to_string(), "Unknown field `nope` for resource press");
    }
}
