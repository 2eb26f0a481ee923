//! Parsing of model replies into scored candidates.
//!
//! Models reply in a handful of shapes. Each known shape has an extractor
//! that locates the candidate list inside the decoded JSON; extractors are
//! tried in order until one yields a list where every entry is well formed.
//! Anything else is rejected outright, never partially accepted.

use pipeline::{rank, ScoredCandidate};
use serde_json::Value;
use tracing::debug;

use crate::error::{AiClientError, Result};

type Extractor = fn(&Value) -> Option<&Vec<Value>>;

/// Known reply shapes, in the order they are tried
const EXTRACTORS: &[(&str, Extractor)] = &[
    ("bare array", bare_array),
    ("recommendations", recommendations_field),
    ("workouts", workouts_field),
];

fn bare_array(value: &Value) -> Option<&Vec<Value>> {
    value.as_array()
}

fn recommendations_field(value: &Value) -> Option<&Vec<Value>> {
    value.get("recommendations")?.as_array()
}

fn workouts_field(value: &Value) -> Option<&Vec<Value>> {
    value.get("workouts")?.as_array()
}

const WORKOUT_ID_KEYS: [&str; 3] = ["workoutId", "workout_id", "id"];

/// Parse a model reply, then threshold, sort and cap it to `max` entries
pub fn parse_scored_candidates(content: &str, max: usize) -> Result<Vec<ScoredCandidate>> {
    let body = strip_code_fences(content);
    if body.is_empty() {
        return Err(AiClientError::EmptyResponse);
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| AiClientError::MalformedPayload(format!("reply is not JSON: {e}")))?;

    let mut last_error = None;
    for (shape, extract) in EXTRACTORS {
        let Some(entries) = extract(&value) else {
            continue;
        };
        match entries.iter().map(parse_entry).collect::<Result<Vec<_>>>() {
            Ok(candidates) => {
                debug!("Parsed {} candidates from {} reply", candidates.len(), shape);
                return Ok(rank(candidates, max));
            }
            Err(err) => last_error = Some(err),
        }
    }

    Err(last_error.unwrap_or_else(|| {
        AiClientError::MalformedPayload("unrecognized reply shape".to_string())
    }))
}

/// Remove a surrounding markdown code fence, with or without a language tag
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn parse_entry(entry: &Value) -> Result<ScoredCandidate> {
    let malformed = |msg: &str| AiClientError::MalformedPayload(format!("{msg}: {entry}"));

    let workout_id = WORKOUT_ID_KEYS
        .iter()
        .find_map(|key| entry.get(*key)?.as_str())
        .ok_or_else(|| malformed("entry has no string workoutId"))?;

    let score = entry
        .get("score")
        .and_then(Value::as_f64)
        .filter(|s| s.is_finite())
        .ok_or_else(|| malformed("entry has no numeric score"))?;
    if !(0.0..=100.0).contains(&score) {
        return Err(malformed("score outside 0-100"));
    }

    let reasoning = entry
        .get("reasoning")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("entry has no string reasoning"))?;

    Ok(ScoredCandidate::new(workout_id, score, reasoning))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workouts_shape() {
        let reply = r#"{"workouts":[{"workoutId":"w1","score":72,"reasoning":"good fit"}]}"#;
        let parsed = parse_scored_candidates(reply, 10).unwrap();

        assert_eq!(parsed, vec![ScoredCandidate::new("w1", 72.0, "good fit")]);
        assert_eq!(parsed[0].confidence(), 0.72);
    }

    #[test]
    fn test_bare_array_and_aliases() {
        let reply = r#"[
            {"workout_id":"w1","score":65,"reasoning":"a"},
            {"id":"w2","score":90.5,"reasoning":"b"}
        ]"#;
        let parsed = parse_scored_candidates(reply, 10).unwrap();

        let ids: Vec<&str> = parsed.iter().map(|c| c.workout_id.as_str()).collect();
        assert_eq!(ids, vec!["w2", "w1"]);
    }

    #[test]
    fn test_code_fences_stripped() {
        let reply = "```json\n{\"recommendations\":[{\"workoutId\":\"w1\",\"score\":80,\"reasoning\":\"ok\"}]}\n```";
        let parsed = parse_scored_candidates(reply, 10).unwrap();
        assert_eq!(parsed.len(), 1);

        assert_eq!(strip_code_fences("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fences("  []  "), "[]");
    }

    #[test]
    fn test_threshold_sort_and_cap() {
        let reply = r#"{"recommendations":[
            {"workoutId":"low","score":40,"reasoning":"meh"},
            {"workoutId":"a","score":70,"reasoning":"ok"},
            {"workoutId":"b","score":85,"reasoning":"great"}
        ]}"#;
        let parsed = parse_scored_candidates(reply, 1).unwrap();

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].workout_id, "b");
    }

    #[test]
    fn test_malformed_entry_rejects_whole_reply() {
        let reply = r#"{"recommendations":[
            {"workoutId":"a","score":70,"reasoning":"ok"},
            {"workoutId":"b","score":"high","reasoning":"bad"}
        ]}"#;
        assert!(matches!(
            parse_scored_candidates(reply, 10),
            Err(AiClientError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_out_of_range_score_rejected() {
        let reply = r#"[{"workoutId":"a","score":140,"reasoning":"too keen"}]"#;
        assert!(parse_scored_candidates(reply, 10).is_err());
    }

    #[test]
    fn test_falls_through_to_next_shape() {
        // "recommendations" is not a list of entries, "workouts" is
        let reply = r#"{"recommendations":[1,2],"workouts":[{"workoutId":"w1","score":61,"reasoning":"x"}]}"#;
        let parsed = parse_scored_candidates(reply, 10).unwrap();
        assert_eq!(parsed[0].workout_id, "w1");
    }

    #[test]
    fn test_unrecognized_shapes() {
        assert!(matches!(
            parse_scored_candidates("", 10),
            Err(AiClientError::EmptyResponse)
        ));
        assert!(matches!(
            parse_scored_candidates("not json", 10),
            Err(AiClientError::MalformedPayload(_))
        ));
        assert!(matches!(
            parse_scored_candidates(r#"{"items":[]}"#, 10),
            Err(AiClientError::MalformedPayload(_))
        ));
    }
}
