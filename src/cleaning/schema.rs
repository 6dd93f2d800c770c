//! Column schema: which semantic columns the pipeline knows about, what type
//! they are coerced to, and whether their absence is fatal.

use crate::error::{CleanError, Result};
use serde::{Deserialize, Serialize};

/// Target type of a known column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Date,
    Numeric,
    Text,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Numeric => "numeric",
            Self::Text => "text",
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a missing column aborts the run or is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Required,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRule {
    /// Normalized column name
    pub name: String,
    pub kind: ColumnKind,
    pub presence: Presence,
    /// Rows with a strictly negative value are domain-invalid
    #[serde(default)]
    pub non_negative: bool,
}

impl ColumnRule {
    pub fn required(name: &str, kind: ColumnKind) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            presence: Presence::Required,
            non_negative: false,
        }
    }

    pub fn optional(name: &str, kind: ColumnKind) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            presence: Presence::Optional,
            non_negative: false,
        }
    }

    pub fn non_negative(mut self) -> Self {
        self.non_negative = true;
        self
    }
}

/// Declared columns plus the date formats tried by the type coercer.
///
/// Columns not listed here are free-form text: never coerced, still subject
/// to null-row removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSchema {
    pub columns: Vec<ColumnRule>,
    /// strftime-style formats, tried in order; the first that parses wins
    pub date_formats: Vec<String>,
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self {
            columns: vec![
                ColumnRule::required("fecha", ColumnKind::Date),
                ColumnRule::optional("passengers", ColumnKind::Numeric).non_negative(),
                ColumnRule::optional("sales", ColumnKind::Numeric).non_negative(),
                ColumnRule::optional("lost_sales", ColumnKind::Numeric),
                ColumnRule::optional("item_code", ColumnKind::Numeric),
            ],
            date_formats: default_date_formats(),
        }
    }
}

/// Month-first slash dates win over day-first ones when both readings are
/// valid; `%d/%m/%Y` only applies when the month-first reading fails.
pub fn default_date_formats() -> Vec<String> {
    [
        "%Y-%m-%d",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d/%m/%Y",
    ]
    .iter()
    .map(|f| (*f).to_owned())
    .collect()
}

impl ColumnSchema {
    /// Rules of `kind` whose column exists in `present`, in schema order.
    pub fn present_of_kind<'a, S: AsRef<str>>(
        &'a self,
        kind: ColumnKind,
        present: &'a [S],
    ) -> impl Iterator<Item = &'a ColumnRule> + 'a {
        self.columns
            .iter()
            .filter(move |rule| rule.kind == kind)
            .filter(move |rule| present.iter().any(|name| name.as_ref() == rule.name))
    }

    /// Non-negative rules whose column exists in `present`.
    pub fn present_non_negative<'a, S: AsRef<str>>(
        &'a self,
        present: &'a [S],
    ) -> impl Iterator<Item = &'a ColumnRule> + 'a {
        self.columns
            .iter()
            .filter(|rule| rule.non_negative)
            .filter(move |rule| present.iter().any(|name| name.as_ref() == rule.name))
    }

    /// Fails on the first required column absent from `present`.
    ///
    /// # Errors
    ///
    /// Returns [`CleanError::MissingColumn`] naming the column and `dataset`.
    pub fn check_required<S: AsRef<str>>(&self, present: &[S], dataset: &str) -> Result<()> {
        let missing = self
            .columns
            .iter()
            .filter(|rule| rule.presence == Presence::Required)
            .find(|rule| !present.iter().any(|name| name.as_ref() == rule.name));

        match missing {
            Some(rule) => Err(CleanError::MissingColumn {
                column: rule.name.clone(),
                dataset: dataset.to_owned(),
            }),
            None => Ok(()),
        }
    }

    /// Rejects schemas that would make the pipeline ambiguous.
    ///
    /// # Errors
    ///
    /// Returns [`CleanError::Config`] for duplicate names, non-normalized
    /// names, non-negative text/date rules or an empty date format list.
    pub fn validate(&self) -> Result<()> {
        for (idx, rule) in self.columns.iter().enumerate() {
            if self.columns[..idx].iter().any(|r| r.name == rule.name) {
                return Err(CleanError::Config(format!(
                    "column '{}' is declared twice",
                    rule.name
                )));
            }
            if super::normalize::normalize_column_name(&rule.name) != rule.name {
                return Err(CleanError::Config(format!(
                    "column '{}' is not a normalized name",
                    rule.name
                )));
            }
            if rule.non_negative && rule.kind != ColumnKind::Numeric {
                return Err(CleanError::Config(format!(
                    "column '{}' is {} and cannot be non_negative",
                    rule.name, rule.kind
                )));
            }
        }
        if self.date_formats.is_empty()
            && self.columns.iter().any(|r| r.kind == ColumnKind::Date)
        {
            return Err(CleanError::Config("no date formats configured".to_owned()));
        }
        Ok(())
    }
}
