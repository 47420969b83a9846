//! Field edits given on the command line.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use expo_admin_core::form::FormState;
use expo_admin_core::locale::Locale;
use expo_admin_core::organizers::OrganizerList;
use expo_admin_core::payload::FileAttachment;

/// One `--organizer tk|en|ru[|logo]` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizerSpec {
    pub tk: String,
    pub en: String,
    pub ru: String,
    pub logo: Option<PathBuf>,
}

impl OrganizerSpec {
    fn parse(raw: &str) -> Result<Self> {
        let parts: Vec<&str> = raw.split('|').map(str::trim).collect();
        let (names, logo) = match parts.as_slice() {
            [tk, en, ru] => ([*tk, *en, *ru], None),
            [tk, en, ru, logo] if !logo.is_empty() => ([*tk, *en, *ru], Some(PathBuf::from(logo))),
            [tk, en, ru, _] => ([*tk, *en, *ru], None),
            _ => bail!("organizer `{raw}` must look like `tk|en|ru` or `tk|en|ru|logo-path`"),
        };
        Ok(Self {
            tk: names[0].to_string(),
            en: names[1].to_string(),
            ru: names[2].to_string(),
            logo,
        })
    }

    fn name(&self, locale: Locale) -> &str {
        match locale {
            Locale::Tk => &self.tk,
            Locale::En => &self.en,
            Locale::Ru => &self.ru,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormEdits {
    pub values: Vec<(String, String)>,
    pub files: Vec<(String, PathBuf)>,
    pub organizers: Vec<OrganizerSpec>,
    pub removed_organizers: Vec<usize>,
}

fn split_assignment(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once('=')
        .with_context(|| format!("`{raw}` must look like FIELD=VALUE"))?;
    let name = name.trim();
    if name.is_empty() {
        bail!("`{raw}` has an empty field name");
    }
    Ok((name.to_string(), value.to_string()))
}

impl FormEdits {
    pub fn parse(
        values: &[String],
        files: &[String],
        organizers: &[String],
        removed_organizers: &[usize],
    ) -> Result<Self> {
        Ok(Self {
            values: values
                .iter()
                .map(|raw| split_assignment(raw))
                .collect::<Result<_>>()?,
            files: files
                .iter()
                .map(|raw| split_assignment(raw).map(|(name, path)| (name, PathBuf::from(path))))
                .collect::<Result<_>>()?,
            organizers: organizers
                .iter()
                .map(|raw| OrganizerSpec::parse(raw))
                .collect::<Result<_>>()?,
            removed_organizers: removed_organizers.to_vec(),
        })
    }

    /// Apply to a loaded form. Removals refer to the rows as loaded and
    /// run before new organizers are added.
    pub fn apply(&self, form: &mut FormState) -> Result<()> {
        for (name, value) in &self.values {
            form.set(name, value.as_str())?;
        }
        for (name, path) in &self.files {
            if !path.is_file() {
                bail!("{} is not a readable file", path.display());
            }
            form.attach(name, FileAttachment::new(path))?;
        }

        let touches_organizers = !self.organizers.is_empty() || !self.removed_organizers.is_empty();
        if touches_organizers && !form.resource().has_organizers() {
            bail!("{} has no organizers", form.resource().name);
        }
        let organizers = form.organizers_mut();
        for &index in &self.removed_organizers {
            organizers.soft_remove(index)?;
        }
        for spec in &self.organizers {
            let index = next_row(organizers);
            for &locale in Locale::all() {
                organizers.set_name(index, locale, spec.name(locale))?;
            }
            if let Some(logo) = &spec.logo {
                organizers.set_logo(index, FileAttachment::new(logo))?;
            }
        }
        Ok(())
    }
}

/// The trailing blank row of an Add form is filled before new rows are
/// appended.
fn next_row(list: &mut OrganizerList) -> usize {
    let reusable = list
        .len()
        .checked_sub(1)
        .filter(|&last| list.get(last).is_some_and(|r| !r.is_removed() && !r.has_content()));
    match reusable {
        Some(last) => last,
        None => list.add(),
    }
}
