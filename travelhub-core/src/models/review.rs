//! Review (rating, expenditure, comment) parsing

use serde::Deserialize;

use super::ValidationError;

const MAX_COMMENT_LEN: usize = 5000;

/// Raw review form input. Numbers arrive as text from HTML forms.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReviewInput {
    pub recommendation: Option<String>,
    pub expenditure: Option<String>,
    pub comment: Option<String>,
}

/// Parsed review values. Rating range and expenditure sign are not
/// restricted; blank fields are stored as NULL.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReviewDraft {
    pub recommendation: Option<i32>,
    pub expenditure: Option<f64>,
    pub comment: Option<String>,
}

impl ReviewDraft {
    pub fn new(input: &ReviewInput) -> Result<Self, ValidationError> {
        let recommendation = match blank_to_none(input.recommendation.as_deref()) {
            Some(raw) => Some(raw.parse::<i32>().map_err(|_| ValidationError::NotANumber {
                field: "recommendation",
                value: raw.to_owned(),
            })?),
            None => None,
        };

        let expenditure = match blank_to_none(input.expenditure.as_deref()) {
            Some(raw) => {
                let value = raw.parse::<f64>().map_err(|_| ValidationError::NotANumber {
                    field: "expenditure",
                    value: raw.to_owned(),
                })?;
                // "inf" and "NaN" parse successfully but are not amounts
                if !value.is_finite() {
                    return Err(ValidationError::NotANumber {
                        field: "expenditure",
                        value: raw.to_owned(),
                    });
                }
                Some(value)
            }
            None => None,
        };

        let comment = match blank_to_none(input.comment.as_deref()) {
            Some(text) if text.chars().count() > MAX_COMMENT_LEN => {
                return Err(ValidationError::TooLong {
                    field: "comment",
                    max: MAX_COMMENT_LEN,
                })
            }
            Some(text) => Some(text.to_owned()),
            None => None,
        };

        Ok(Self {
            recommendation,
            expenditure,
            comment,
        })
    }
}

fn blank_to_none(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}
