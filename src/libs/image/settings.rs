//! The `_settings` object of a tree document.
//!
//! Every field is optional on input. Loading is a second stage: a value
//! replaces the current layout parameter only when it is non-negative
//! (numbers) or non-empty (strings, dates). Dumping fills every field,
//! including computed values that are never read back.

use crate::libs::color::Color;
use crate::libs::date::Date;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "_comment", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Page size in points, `[width, height]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas: Option<[f64; 2]>,
    /// Relative to the canvas size, split between both sides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_tree_ts: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_ts_clades: Option<f64>,
    /// `[x, y, width, height]`, informational
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<[f64; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<TreeSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_series: Option<TimeSeriesSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clades: Option<CladesSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coloring: Option<ColoringSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<TitleSettings>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSettings {
    #[serde(rename = "_comment", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal_step: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_offset: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_edge: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_x: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_strains_threshold: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_annotation_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_annotation_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_annotation_offset: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_interleave: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_branch_ids: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_annotations: Option<Vec<BranchAnnotation>>,

    // informational
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_lines: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_step: Option<f64>,
}

/// Display overrides for the internal node whose branch id is `id`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchAnnotation {
    pub id: String,
    /// Replaces the node name, `\n` separates lines
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub label_offset_x: f64,
    #[serde(default)]
    pub label_offset_y: f64,
    /// Leader line from the branch to the label
    #[serde(default)]
    pub show_line: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    /// Vertical extent of the leader line below the branch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_y: Option<f64>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesSettings {
    #[serde(rename = "_comment", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_width: Option<f64>,
    /// Relative to `month_width`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_line_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_label_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_number_of_months: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_separator_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_separator_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_subtree_top_bottom: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtree_top_bottom: Option<Vec<SubtreeTopBottom>>,

    // informational
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_months: Option<usize>,
}

/// Guide lines across the time series at the first and last leaf of the
/// subtree whose branch id is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtreeTopBottom {
    pub id: String,
    #[serde(default = "yes")]
    pub show_top: bool,
    #[serde(default = "yes")]
    pub show_bottom: bool,
    #[serde(default = "gray")]
    pub color: Color,
    #[serde(default = "half")]
    pub line_width: f64,
}

fn yes() -> bool {
    true
}

fn gray() -> Color {
    Color::GRAY
}

fn half() -> f64 {
    0.5
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CladesSettings {
    #[serde(rename = "_comment", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrow_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrow_color: Option<Color>,
    /// Fraction of the vertical step to extend arrows up and down
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrow_extra: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator_in_tree: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator_in_time_series: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_clade: Option<Vec<CladeArrowSettings>>,

    // informational
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

/// Per-clade override, matched by `_id`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CladeArrowSettings {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_position_offset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_offset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColoringSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_show: Option<bool>,
    /// From the left end of the tree under its last leaf row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_offset: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_interleave: Option<f64>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// From the viewport origin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<[f64; 2]>,
}

// ----------------------------------------------------------------------------
// Second stage helpers
// ----------------------------------------------------------------------------

pub fn set_if_non_negative(target: &mut f64, value: Option<f64>) {
    if let Some(v) = value {
        if v >= 0.0 {
            *target = v;
        }
    }
}

pub fn set_count_if_non_negative(target: &mut usize, value: Option<i64>) {
    if let Some(v) = value {
        if v >= 0 {
            *target = v as usize;
        }
    }
}

pub fn set_if_some<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

pub fn set_if_not_empty(target: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        if !v.is_empty() {
            *target = v.clone();
        }
    }
}

pub fn set_date_if_not_empty(target: &mut Date, value: Option<Date>) {
    if let Some(v) = value {
        if !v.is_empty() {
            *target = v;
        }
    }
}

impl Settings {
    pub fn from_json(value: &serde_json::Value) -> Result<Self, crate::libs::phylo::TreeError> {
        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn to_json(&self) -> serde_json::Value {
        // plain data with string keys always converts
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_settings_partial() {
        let s = Settings::from_json(&json!({
            "border": 0.2,
            "tree": {"label_scale": -1, "line_color": "#ff0000", "width_comment": "ignored"},
            "time_series": {"begin": "", "end": "2019-05-01"},
            "clades": {"per_clade": [{"_id": "3C.2a", "label": "2a", "slot": 1}]},
            "unknown": 1
        }))
        .unwrap();
        assert_eq!(s.border, Some(0.2));
        let tree = s.tree.unwrap();
        assert_eq!(tree.label_scale, Some(-1.0));
        assert_eq!(tree.line_color, Some(Color::new(0xFF0000)));
        let ts = s.time_series.unwrap();
        assert_eq!(ts.begin, Some(Date::default()));
        assert_eq!(ts.end, Some(Date::new(2019, 5, 1)));
        let per = &s.clades.unwrap().per_clade.unwrap()[0];
        assert_eq!(per.id, "3C.2a");
        assert_eq!(per.slot, Some(1));
        assert_eq!(per.label_offset, None);
    }

    #[test]
    fn test_settings_second_stage() {
        let mut v = 5.0;
        set_if_non_negative(&mut v, Some(-1.0));
        assert_eq!(v, 5.0);
        set_if_non_negative(&mut v, Some(0.0));
        assert_eq!(v, 0.0);
        set_if_non_negative(&mut v, None);
        assert_eq!(v, 0.0);

        let mut s = "middle".to_string();
        set_if_not_empty(&mut s, &Some(String::new()));
        assert_eq!(s, "middle");
        set_if_not_empty(&mut s, &Some("top".to_string()));
        assert_eq!(s, "top");

        let mut d = Date::new(2019, 1, 1);
        set_date_if_not_empty(&mut d, Some(Date::default()));
        assert_eq!(d, Date::new(2019, 1, 1));

        let mut n = 20usize;
        set_count_if_non_negative(&mut n, Some(-3));
        assert_eq!(n, 20);
        set_count_if_non_negative(&mut n, Some(3));
        assert_eq!(n, 3);
    }

    #[test]
    fn test_settings_bad_color() {
        assert!(Settings::from_json(&json!({"tree": {"line_color": "red"}})).is_err());
    }
}
