use crate::foundation::error::{MorphError, MorphResult};

/// The two images the host page supplies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetRole {
    /// Image visible before the reveal.
    Before,
    /// Image uncovered by the reveal.
    After,
}

impl AssetRole {
    /// Accessible description of the image.
    pub fn alt_text(self) -> &'static str {
        match self {
            Self::Before => "Before transformation",
            Self::After => "After transformation",
        }
    }
}

/// One image as handed to a surface: where to load it from and how to describe it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AssetBinding {
    /// Which layer the image fills.
    pub role: AssetRole,
    /// Relative path, as configured.
    pub source: String,
    /// Accessible description.
    pub alt_text: &'static str,
}

/// Relative resource paths for the "before" and "after" images.
///
/// The core never opens these. It validates them and passes them to the surface through
/// `RenderSurface::attach` before the first frame.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneAssets {
    /// Path of the image shown before the reveal.
    pub before: String,
    /// Path of the image uncovered by the reveal.
    pub after: String,
}

impl Default for SceneAssets {
    fn default() -> Self {
        Self {
            before: "images/before.svg".to_owned(),
            after: "images/after.svg".to_owned(),
        }
    }
}

impl SceneAssets {
    /// Path registered for `role`.
    pub fn source(&self, role: AssetRole) -> &str {
        match role {
            AssetRole::Before => &self.before,
            AssetRole::After => &self.after,
        }
    }

    /// Both images in paint order, "before" first.
    pub fn bindings(&self) -> [AssetBinding; 2] {
        [AssetRole::Before, AssetRole::After].map(|role| AssetBinding {
            role,
            source: self.source(role).to_owned(),
            alt_text: role.alt_text(),
        })
    }

    /// Check both paths are non-empty, relative and stay below the asset root.
    pub fn validate(&self) -> MorphResult<()> {
        validate_rel_source(&self.before, "assets.before")?;
        validate_rel_source(&self.after, "assets.after")
    }
}

fn validate_rel_source(source: &str, field: &str) -> MorphResult<()> {
    if source.trim().is_empty() {
        return Err(MorphError::validation(format!("{field} must be non-empty")));
    }
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(MorphError::validation(format!(
            "{field} must be a relative path"
        )));
    }
    if s.split('/').any(|part| part == "..") {
        return Err(MorphError::validation(format!(
            "{field} must not contain '..'"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/config/assets.rs"]
mod tests;
