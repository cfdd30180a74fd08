//! Species records and the column set used to display them.

use serde::{Deserialize, Serialize};

use crate::table::{CellStyle, CellValue, ColumnDef, ColumnError, ColumnModel, RenderedCell};

/// One row of the species dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub id: u32,
    pub name: String,
    /// Sprite URL.
    pub image: String,
    /// Height in decimetres.
    pub height: u32,
    /// Weight in hectograms.
    pub weight: u32,
    #[serde(default)]
    pub types: Vec<String>,
    pub url: String,
}

/// Column ids hidden at startup unless overridden.
pub const DEFAULT_HIDDEN: &[&str] = &["url"];

/// Uppercases the first character of `s`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Builds the column model for [`Species`] rows.
pub fn columns() -> Result<ColumnModel<Species>, ColumnError> {
    ColumnModel::new(vec![
        ColumnDef::new("image", "Image", |s: &Species| CellValue::Image(s.image.clone()))
            .fixed_size(14)
            .cell(|_, ctx| {
                // Terminals cannot show the sprite; show alt text instead.
                RenderedCell::styled(format!("[{}]", ctx.row.name), CellStyle::Placeholder)
            }),
        ColumnDef::new("name", "Name", |s: &Species| CellValue::Text(s.name.clone()))
            .fixed_size(14)
            .not_hideable()
            .cell(|value, _| RenderedCell::plain(capitalize(&value.to_string()))),
        ColumnDef::new("height", "Height", |s: &Species| {
            CellValue::Number(f64::from(s.height))
        })
        .fixed_size(8)
        .cell(|value, _| RenderedCell::styled(value.to_string(), CellStyle::Numeric)),
        ColumnDef::new("weight", "Weight", |s: &Species| {
            CellValue::Number(f64::from(s.weight))
        })
        .fixed_size(8)
        .cell(|value, _| RenderedCell::styled(value.to_string(), CellStyle::Numeric)),
        ColumnDef::new("types", "Types", |s: &Species| CellValue::TextList(s.types.clone()))
            .fixed_size(12),
        ColumnDef::new("url", "URL", |s: &Species| CellValue::Text(s.url.clone()))
            .fixed_size(44)
            .cell(|value, _| RenderedCell::styled(value.to_string(), CellStyle::Link)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulbasaur() -> Species {
        Species {
            id: 1,
            name: "bulbasaur".into(),
            image: "https://img.example/1.png".into(),
            height: 7,
            weight: 69,
            types: vec!["grass".into(), "poison".into()],
            url: "https://api.example/pokemon/1/".into(),
        }
    }

    fn rendered(id: &str) -> RenderedCell {
        let cols = columns().unwrap();
        cols.get(id).unwrap().render_cell(0, &bulbasaur())
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("ivysaur"), "Ivysaur");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("émile"), "Émile");
    }

    #[test]
    fn cells_render_like_the_table_expects() {
        assert_eq!(rendered("image").text, "[bulbasaur]");
        assert_eq!(rendered("image").style, CellStyle::Placeholder);
        assert_eq!(rendered("name").text, "Bulbasaur");
        assert_eq!(rendered("height").text, "7");
        assert_eq!(rendered("weight").text, "69");
        assert_eq!(rendered("types").text, "grass, poison");
        assert_eq!(rendered("url").style, CellStyle::Link);
    }

    #[test]
    fn name_column_is_not_hideable() {
        let cols = columns().unwrap();
        let hideable: Vec<&str> = cols
            .columns()
            .iter()
            .filter(|c| c.can_hide)
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(hideable, ["image", "height", "weight", "types", "url"]);
    }

    #[test]
    fn deserializes_without_types() {
        let json = r#"{"id":4,"name":"charmander","image":"i","height":6,"weight":85,"url":"u"}"#;
        let s: Species = serde_json::from_str(json).unwrap();
        assert!(s.types.is_empty());
        assert_eq!(s.weight, 85);
    }
}
