use anyhow::{Context, Result, bail};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
struct Catalog {
    pub affirmations: Vec<String>,
}

static CATALOG: OnceCell<Catalog> = OnceCell::new();

impl Catalog {
    const FILE_NAME: &'static str = "affirmations.yml";

    fn load() -> Result<&'static Catalog> {
        CATALOG.get_or_try_init(|| {
            let raw = fs::read_to_string(Self::FILE_NAME)
                .with_context(|| format!("failed to read catalog {}", Self::FILE_NAME))?;

            let catalog: Catalog = serde_yaml::from_str::<Catalog>(&raw)
                .with_context(|| format!("failed to parse catalog {}", Self::FILE_NAME))?;

            catalog.validate().context("catalog validation failed")?;

            Ok(catalog)
        })
    }

    fn validate(&self) -> Result<()> {
        if self.affirmations.is_empty() {
            bail!("affirmations must not be empty");
        }
        for (index, text) in self.affirmations.iter().enumerate() {
            if text.trim().is_empty() {
                bail!("affirmation at index {index} is blank");
            }
        }
        Ok(())
    }
}

/// The bundled built-in quote texts, loaded once per process.
pub fn builtin_texts() -> Result<&'static [String]> {
    Catalog::load().map(|catalog| catalog.affirmations.as_slice())
}
