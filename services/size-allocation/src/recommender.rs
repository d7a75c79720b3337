//! Size Recommender
//!
//! Stateless selection of coat, base-layer and socks sizes for one student.
//! Weight comparisons happen in catties, the unit of every table weight range.

use sizing_models::{
    BracketRange, Garment, Recommendation, SizeBracket, SizeTable, StudentRecord,
};
use thiserror::Error;

/// Socks label used when the table has no socks brackets at all.
pub const DEFAULT_SOCKS_SIZE: &str = "6-8岁";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    #[error("{field} is not a finite number ({value})")]
    NonFiniteMeasurement { field: &'static str, value: f64 },

    #[error("size table has no {garment} brackets")]
    NoBrackets { garment: Garment },
}

/// All three sizes for `student`.
pub fn recommend(student: &StudentRecord, table: &SizeTable) -> Result<Recommendation, RecommendError> {
    Ok(Recommendation {
        student: student.clone(),
        coat_size: recommend_size(student, table, Garment::Coat)?,
        underwear_size: recommend_size(student, table, Garment::Underwear)?,
        socks_size: recommend_socks_size(student, &table.socks)?,
    })
}

/// Coat or base-layer size for `student`.
///
/// Children's brackets are tried first: a bracket fits when either the weight
/// or the height range contains the student, and the largest fitting size
/// wins. Otherwise the gender-eligible adult brackets are searched for the
/// tightest weight fit, then the whole adult list for the nearest weight
/// boundary.
pub fn recommend_size(
    student: &StudentRecord,
    table: &SizeTable,
    garment: Garment,
) -> Result<String, RecommendError> {
    let weight = finite("weight", student.weight_catty())?;
    let height = finite("height", student.height_cm)?;

    let children = table.children(garment);
    if let Some(bracket) = largest_child_fit(children, weight, height) {
        tracing::debug!(name = %student.name, %garment, size = bracket.size(), "Children's bracket matched");
        return Ok(bracket.size().to_string());
    }

    let adult = table.adult(garment);
    let eligible: Vec<&SizeBracket> = adult.iter().filter(|b| b.admits(student.gender)).collect();

    if let Some(bracket) = tightest_adult_fit(&eligible, weight) {
        tracing::debug!(name = %student.name, %garment, size = bracket.size(), "Adult bracket matched");
        return Ok(bracket.size().to_string());
    }

    // Gender only narrows the range match; the boundary is taken over the whole list.
    let pool: Vec<&SizeBracket> = if adult.is_empty() {
        children.iter().collect()
    } else {
        adult.iter().collect()
    };

    let bracket = nearest_weight_boundary(&pool, weight).ok_or(RecommendError::NoBrackets { garment })?;
    tracing::debug!(
        name = %student.name,
        %garment,
        size = bracket.size(),
        weight_catty = weight,
        "No bracket contains the weight, using nearest boundary"
    );
    Ok(bracket.size().to_string())
}

/// Socks size for `student` from the socks bracket list.
pub fn recommend_socks_size(
    student: &StudentRecord,
    socks: &[SizeBracket],
) -> Result<String, RecommendError> {
    let age = finite("age", student.age)?;
    let aged: Vec<(&SizeBracket, &BracketRange)> =
        socks.iter().filter_map(|b| b.age().map(|a| (b, a))).collect();

    if let Some((bracket, _)) = aged.iter().find(|(_, range)| range.contains(age)) {
        return Ok(bracket.size().to_string());
    }

    let fallback = if aged.iter().all(|(_, range)| age < range.min()) {
        aged.iter()
            .copied()
            .reduce(|best, next| if next.1.min() < best.1.min() { next } else { best })
    } else {
        aged.iter()
            .copied()
            .reduce(|best, next| if next.1.min() >= best.1.min() { next } else { best })
    };

    Ok(fallback
        .map(|(bracket, _)| bracket.size().to_string())
        .unwrap_or_else(|| DEFAULT_SOCKS_SIZE.to_string()))
}

fn finite(field: &'static str, value: f64) -> Result<f64, RecommendError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RecommendError::NonFiniteMeasurement { field, value })
    }
}

/// Largest size whose weight or height range holds the student; the first
/// bracket wins among equal sizes.
fn largest_child_fit(brackets: &[SizeBracket], weight: f64, height: f64) -> Option<&SizeBracket> {
    brackets
        .iter()
        .filter(|b| {
            b.weight().is_some_and(|w| w.contains(weight))
                || b.height().is_some_and(|h| h.contains(height))
        })
        .reduce(|best, next| if next.ordinal() > best.ordinal() { next } else { best })
}

/// Smallest `weight_max` among brackets containing the weight, first on ties.
fn tightest_adult_fit<'a>(brackets: &[&'a SizeBracket], weight: f64) -> Option<&'a SizeBracket> {
    brackets
        .iter()
        .copied()
        .filter_map(|b| b.weight().filter(|w| w.contains(weight)).map(|w| (b, w.max())))
        .reduce(|best, next| if next.1 < best.1 { next } else { best })
        .map(|(bracket, _)| bracket)
}

/// Smallest-minimum bracket when the weight is below every range, otherwise
/// the largest-minimum bracket (last on ties).
fn nearest_weight_boundary<'a>(brackets: &[&'a SizeBracket], weight: f64) -> Option<&'a SizeBracket> {
    let mins: Vec<(&'a SizeBracket, f64)> = brackets
        .iter()
        .copied()
        .filter_map(|b| b.weight().map(|w| (b, w.min())))
        .collect();

    let chosen = if mins.iter().all(|(_, min)| weight < *min) {
        mins.into_iter().reduce(|best, next| if next.1 < best.1 { next } else { best })
    } else {
        mins.into_iter().reduce(|best, next| if next.1 >= best.1 { next } else { best })
    };
    chosen.map(|(bracket, _)| bracket)
}
