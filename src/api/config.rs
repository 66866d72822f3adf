use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::ScaleOptions;
use crate::error::{ScatterError, ScatterResult};
use crate::fetch::{PathLayout, ResourceLocator};

/// Public view bootstrap configuration.
///
/// This type is serializable so host applications can persist/load the view
/// setup without inventing their own ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterplotConfig {
    pub endpoint: String,
    #[serde(default = "default_size_range")]
    pub size_range: (f64, f64),
    #[serde(default = "default_size_exponent")]
    pub size_exponent: f64,
    #[serde(default = "default_fixed_marker_size")]
    pub fixed_marker_size: f64,
    #[serde(default = "default_hover_clear_delay_ms")]
    pub hover_clear_delay_ms: u64,
    #[serde(default = "default_wide_variables")]
    pub wide_variables: IndexMap<String, Vec<String>>,
    #[serde(default = "default_regional_collections")]
    pub regional_collections: Vec<String>,
    #[serde(default)]
    pub path_layout: PathLayout,
}

impl ScatterplotConfig {
    /// Creates a config with default sizing and collection layout.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            size_range: default_size_range(),
            size_exponent: default_size_exponent(),
            fixed_marker_size: default_fixed_marker_size(),
            hover_clear_delay_ms: default_hover_clear_delay_ms(),
            wide_variables: default_wide_variables(),
            regional_collections: default_regional_collections(),
            path_layout: PathLayout::default(),
        }
    }

    pub fn from_json_str(input: &str) -> ScatterResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ScatterError::Configuration(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ScatterResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ScatterError::Configuration(format!("failed to serialize config: {e}")))
    }

    /// Declares the wide-file column list for a collection.
    #[must_use]
    pub fn with_wide_variables(
        mut self,
        collection: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.wide_variables.insert(
            collection.into(),
            columns.into_iter().map(Into::into).collect(),
        );
        self
    }

    #[must_use]
    pub fn with_size_range(mut self, low: f64, high: f64) -> Self {
        self.size_range = (low, high);
        self
    }

    #[must_use]
    pub fn with_path_layout(mut self, layout: PathLayout) -> Self {
        self.path_layout = layout;
        self
    }

    #[must_use]
    pub fn with_hover_clear_delay(mut self, delay: Duration) -> Self {
        self.hover_clear_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn validate(&self) -> ScatterResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(ScatterError::Configuration(
                "no endpoint specified for scatterplot".to_owned(),
            ));
        }
        let (low, high) = self.size_range;
        if !low.is_finite() || !high.is_finite() {
            return Err(ScatterError::Configuration(
                "size range must be finite".to_owned(),
            ));
        }
        if !self.size_exponent.is_finite() || self.size_exponent <= 0.0 {
            return Err(ScatterError::Configuration(
                "size exponent must be finite and positive".to_owned(),
            ));
        }
        if !self.fixed_marker_size.is_finite() || self.fixed_marker_size < 0.0 {
            return Err(ScatterError::Configuration(
                "fixed marker size must be finite and non-negative".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn scale_options(&self) -> ScaleOptions {
        ScaleOptions {
            range: self.size_range,
            exponent: self.size_exponent,
        }
    }

    #[must_use]
    pub fn hover_clear_delay(&self) -> Duration {
        Duration::from_millis(self.hover_clear_delay_ms)
    }

    pub fn locator(&self) -> ScatterResult<ResourceLocator> {
        ResourceLocator::new(
            &self.endpoint,
            self.path_layout,
            self.regional_collections.clone(),
        )
    }
}

/// What the view plots: a collection (optionally one region of it) and the
/// x/y variables plus an optional marker-size variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScatterQuery {
    #[serde(default)]
    pub collection: String,
    #[serde(default)]
    pub region: Option<String>,
    pub x_var: String,
    pub y_var: String,
    #[serde(default)]
    pub z_var: Option<String>,
}

impl ScatterQuery {
    #[must_use]
    pub fn new(
        collection: impl Into<String>,
        x_var: impl Into<String>,
        y_var: impl Into<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            region: None,
            x_var: x_var.into(),
            y_var: y_var.into(),
            z_var: None,
        }
    }

    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn with_size_var(mut self, z_var: impl Into<String>) -> Self {
        self.z_var = Some(z_var.into());
        self
    }

    /// Marker-size variable; an empty name means no size dimension.
    #[must_use]
    pub fn size_var(&self) -> Option<&str> {
        self.z_var.as_deref().filter(|name| !name.is_empty())
    }

    /// Variables to load, size variable first.
    #[must_use]
    pub fn variables(&self) -> Vec<String> {
        self.size_var()
            .into_iter()
            .chain([self.x_var.as_str(), self.y_var.as_str()])
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect()
    }

    pub fn validate(&self) -> ScatterResult<()> {
        if self.x_var.is_empty() || self.y_var.is_empty() {
            return Err(ScatterError::Configuration(
                "at least two variables are required to plot".to_owned(),
            ));
        }
        Ok(())
    }

    /// Whether switching from `self` to `next` requires loading data.
    #[must_use]
    pub fn needs_reload(&self, next: &Self) -> bool {
        self.collection != next.collection
            || self.region != next.region
            || self.x_var != next.x_var
            || self.y_var != next.y_var
            || self.size_var() != next.size_var()
    }
}

fn default_size_range() -> (f64, f64) {
    (6.0, 48.0)
}

fn default_size_exponent() -> f64 {
    1.0
}

fn default_fixed_marker_size() -> f64 {
    10.0
}

fn default_hover_clear_delay_ms() -> u64 {
    200
}

fn default_wide_variables() -> IndexMap<String, Vec<String>> {
    let columns = |extra: &str| -> Vec<String> {
        ["id", "name", "lat", "lon", "all_avg", extra, "sz"]
            .into_iter()
            .map(str::to_owned)
            .collect()
    };
    IndexMap::from([
        ("counties".to_owned(), columns("all_ses")),
        ("districts".to_owned(), columns("all_ses")),
        ("schools".to_owned(), columns("frl_pct")),
    ])
}

fn default_regional_collections() -> Vec<String> {
    vec!["schools".to_owned()]
}
