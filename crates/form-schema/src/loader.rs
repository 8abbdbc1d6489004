//! Schema loader for declarative YAML/JSON schema documents

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::array::ArraySchema;
use crate::model::SchemaNode;
use crate::object::{ObjectSchema, Refinement, UnknownKeys};
use crate::string::{StringCheck, StringSchema};
use crate::{Error, Result};

/// Serializable schema node
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum NodeFile {
    String {
        #[serde(default)]
        trim: bool,
        #[serde(default)]
        checks: Vec<CheckFile>,
    },
    Object {
        #[serde(default)]
        strict: bool,
        #[serde(default)]
        fields: FieldsFile,
        #[serde(default)]
        refine: Vec<RefineFile>,
    },
    Array {
        items: Box<NodeFile>,
        #[serde(default)]
        min_items: Option<BoundFile>,
        #[serde(default)]
        max_items: Option<BoundFile>,
    },
}

#[derive(Debug, Deserialize)]
struct FieldFile {
    #[serde(default)]
    optional: bool,
    #[serde(flatten)]
    schema: NodeFile,
}

/// `fields:` mapping of field name to node, in document order
#[derive(Debug, Default)]
struct FieldsFile(Vec<(String, FieldFile)>);

impl<'de> Deserialize<'de> for FieldsFile {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = FieldsFile;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of field names to schemas")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<FieldsFile, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut fields: Vec<(String, FieldFile)> =
                    Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, field)) = map.next_entry::<String, FieldFile>()? {
                    if fields.iter().any(|(existing, _)| *existing == name) {
                        return Err(de::Error::custom(format!("duplicate field '{name}'")));
                    }
                    fields.push((name, field));
                }
                Ok(FieldsFile(fields))
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum CheckFile {
    NonEmpty(Option<String>),
    MinLength(BoundFile),
    MaxLength(BoundFile),
    Pattern(PatternFile),
    Email(Option<String>),
}

/// Either `6` or `{ value: 6, message: "..." }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BoundFile {
    Bare(usize),
    Detailed {
        value: usize,
        #[serde(default)]
        message: Option<String>,
    },
}

impl BoundFile {
    fn into_parts(self) -> (usize, Option<String>) {
        match self {
            BoundFile::Bare(value) => (value, None),
            BoundFile::Detailed { value, message } => (value, message),
        }
    }
}

/// Either `"^[a-z]+$"` or `{ regex: "^[a-z]+$", message: "..." }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PatternFile {
    Bare(String),
    Detailed {
        regex: String,
        #[serde(default)]
        message: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RefineFile {
    FieldsEqual {
        field: String,
        other: String,
        message: String,
    },
}

/// Builds [`SchemaNode`]s from schema documents
#[derive(Debug, Clone, Default)]
pub struct SchemaLoader {
    schema_paths: Vec<PathBuf>,
}

impl SchemaLoader {
    /// Create a loader that resolves names against the given search paths
    pub fn new(schema_paths: Vec<PathBuf>) -> Self {
        Self { schema_paths }
    }

    /// Load a schema by name, trying `<name>.yaml`, `<name>.yml` and
    /// `<name>.json` in each search path
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no search path holds the schema, or
    /// any error from [`SchemaLoader::load_from_file`].
    pub fn load(&self, name: &str) -> Result<SchemaNode> {
        let variations = [
            format!("{name}.yaml"),
            format!("{name}.yml"),
            format!("{name}.json"),
        ];

        for path in &self.schema_paths {
            for variation in &variations {
                let file_path = path.join(variation);
                if file_path.exists() {
                    trace!("Found schema file: {:?}", file_path);
                    return self.load_from_file(&file_path);
                }
            }
        }

        Err(Error::NotFound(format!(
            "Schema {name} not found in search paths: {:?}",
            self.schema_paths
        )))
    }

    /// Load a schema from a specific file path; `.yaml`/`.yml` files are
    /// parsed as YAML, anything else as JSON
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read and
    /// [`Error::InvalidFormat`] when it does not parse.
    pub fn load_from_file(&self, path: &Path) -> Result<SchemaNode> {
        trace!("Loading schema from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;

        if path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
        {
            self.load_from_yaml(&content)
        } else {
            self.load_from_json(&content)
        }
    }

    /// Load a schema from a JSON string
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] on parse failure.
    pub fn load_from_json(&self, json: &str) -> Result<SchemaNode> {
        let file: NodeFile = serde_json::from_str(json)
            .map_err(|e| Error::InvalidFormat(format!("JSON parse error: {e}")))?;
        let node = convert(file);
        debug!(kind = node.kind(), "Loaded schema from JSON");
        Ok(node)
    }

    /// Load a schema from a YAML string
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] on parse failure.
    pub fn load_from_yaml(&self, yaml: &str) -> Result<SchemaNode> {
        let file: NodeFile = serde_yaml::from_str(yaml)
            .map_err(|e| Error::InvalidFormat(format!("YAML parse error: {e}")))?;
        let node = convert(file);
        debug!(kind = node.kind(), "Loaded schema from YAML");
        Ok(node)
    }
}

fn convert(file: NodeFile) -> SchemaNode {
    match file {
        NodeFile::String { trim, checks } => {
            let mut schema = StringSchema::new();
            if trim {
                schema = schema.trim();
            }
            checks
                .into_iter()
                .map(convert_check)
                .fold(schema, StringSchema::check)
                .into()
        }
        NodeFile::Object {
            strict,
            fields,
            refine,
        } => {
            let policy = if strict {
                UnknownKeys::Strict
            } else {
                UnknownKeys::Strip
            };
            let mut schema = ObjectSchema::new().unknown_keys(policy);
            for (name, field) in fields.0 {
                let node = convert(field.schema);
                schema = if field.optional {
                    schema.optional_field(name, node)
                } else {
                    schema.field(name, node)
                };
            }
            for refinement in refine {
                schema = schema.refine(match refinement {
                    RefineFile::FieldsEqual {
                        field,
                        other,
                        message,
                    } => Refinement::fields_equal(field, other, message),
                });
            }
            schema.into()
        }
        NodeFile::Array {
            items,
            min_items,
            max_items,
        } => {
            let mut schema = ArraySchema::new(convert(*items));
            if let Some((value, message)) = min_items.map(BoundFile::into_parts) {
                schema = schema.min_items(value, message);
            }
            if let Some((value, message)) = max_items.map(BoundFile::into_parts) {
                schema = schema.max_items(value, message);
            }
            schema.into()
        }
    }
}

fn convert_check(check: CheckFile) -> StringCheck {
    match check {
        CheckFile::NonEmpty(message) => StringCheck::NonEmpty { message },
        CheckFile::MinLength(bound) => {
            let (value, message) = bound.into_parts();
            StringCheck::MinLength { value, message }
        }
        CheckFile::MaxLength(bound) => {
            let (value, message) = bound.into_parts();
            StringCheck::MaxLength { value, message }
        }
        CheckFile::Pattern(PatternFile::Bare(regex)) => StringCheck::Pattern {
            regex,
            message: None,
        },
        CheckFile::Pattern(PatternFile::Detailed { regex, message }) => {
            StringCheck::Pattern { regex, message }
        }
        CheckFile::Email(message) => StringCheck::Email { message },
    }
}
