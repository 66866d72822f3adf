use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::{HEADER_ID_TOKEN, TableSchema};
use crate::error::{ScatterError, ScatterResult};

/// How per-variable resources are named under the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathLayout {
    /// `<collection>/<variable>.csv`
    #[default]
    Nested,
    /// `<collection>-<variable>.csv`
    Flat,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Shared file holding every declared wide variable of a collection.
    Wide,
    /// One file for one variable.
    Variable(String),
    /// Reduced two-variable file; names are kept sorted.
    ReducedPair(String, String),
}

impl ResourceKind {
    #[must_use]
    pub fn reduced_pair(a: &str, b: &str) -> Self {
        if a <= b {
            Self::ReducedPair(a.to_owned(), b.to_owned())
        } else {
            Self::ReducedPair(b.to_owned(), a.to_owned())
        }
    }

    #[must_use]
    pub fn schema(&self) -> TableSchema {
        match self {
            Self::Variable(_) => TableSchema::Narrow,
            Self::Wide | Self::ReducedPair(..) => TableSchema::Wide,
        }
    }
}

/// A physical resource resolved to its URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    pub kind: ResourceKind,
    pub url: String,
}

impl Resource {
    #[must_use]
    pub fn schema(&self) -> TableSchema {
        self.kind.schema()
    }
}

/// Maps collections, regions and variables to resource URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator {
    endpoint: String,
    layout: PathLayout,
    regional_collections: Vec<String>,
}

impl ResourceLocator {
    pub fn new(
        endpoint: &str,
        layout: PathLayout,
        regional_collections: Vec<String>,
    ) -> ScatterResult<Self> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(ScatterError::Configuration(
                "no endpoint specified for scatterplot".to_owned(),
            ));
        }
        let endpoint = if endpoint.ends_with('/') {
            endpoint.to_owned()
        } else {
            format!("{endpoint}/")
        };

        Ok(Self {
            endpoint,
            layout,
            regional_collections,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether `collection` is partitioned by region.
    #[must_use]
    pub fn is_regional(&self, collection: &str) -> bool {
        self.regional_collections
            .iter()
            .any(|regional| regional == collection)
    }

    /// The region to use for `collection`: `None` for collections that are
    /// not regional, an error when a regional one has no region.
    pub fn required_region<'a>(
        &self,
        collection: &str,
        region: Option<&'a str>,
    ) -> ScatterResult<Option<&'a str>> {
        if !self.is_regional(collection) {
            return Ok(None);
        }
        region
            .filter(|region| !region.is_empty())
            .map(Some)
            .ok_or_else(|| {
                ScatterError::Configuration(format!("collection `{collection}` requires a region"))
            })
    }

    pub fn resolve(
        &self,
        collection: &str,
        region: Option<&str>,
        kind: &ResourceKind,
    ) -> ScatterResult<String> {
        if let ResourceKind::ReducedPair(a, b) = kind {
            return Ok(format!("{}{collection}/reduced/{a}-{b}.csv", self.endpoint));
        }

        let path = if let Some(region) = self.required_region(collection, region)? {
            match kind {
                ResourceKind::Variable(name) => format!("{collection}/{region}/{name}.csv"),
                _ => format!("meta/{collection}/{region}.csv"),
            }
        } else {
            match kind {
                ResourceKind::Variable(name) if collection.is_empty() => format!("{name}.csv"),
                ResourceKind::Variable(name) => match self.layout {
                    PathLayout::Nested => format!("{collection}/{name}.csv"),
                    PathLayout::Flat => format!("{collection}-{name}.csv"),
                },
                _ => format!("meta/{collection}.csv"),
            }
        };
        Ok(format!("{}{path}", self.endpoint))
    }

    /// Deduplicated resources covering `missing`, in first-request order.
    ///
    /// Every variable declared in `wide_members` maps to the single shared
    /// wide resource.
    pub fn plan(
        &self,
        collection: &str,
        region: Option<&str>,
        missing: &[String],
        wide_members: &[String],
    ) -> ScatterResult<Vec<Resource>> {
        let kinds: IndexSet<ResourceKind> = missing
            .iter()
            .map(|name| {
                if name != HEADER_ID_TOKEN && wide_members.contains(name) {
                    ResourceKind::Wide
                } else {
                    ResourceKind::Variable(name.clone())
                }
            })
            .collect();

        kinds
            .into_iter()
            .map(|kind| {
                let url = self.resolve(collection, region, &kind)?;
                Ok(Resource { kind, url })
            })
            .collect()
    }
}
