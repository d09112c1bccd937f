//! Classification of raw log records into typed timeline streams
//!
//! Raw logs mix two record shapes in one array: a record carrying a
//! `latitude` is a position report, anything else is a status event. The
//! shape is decided here, once, and every record that fits neither shape is
//! rejected and reported instead of being guessed at.

use crate::record::{EventKind, PositionSample, Record, StatusEvent};
use crate::timeline::AgentTimeline;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A record as it appears in an agent log, before classification
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RawRecord {
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "loose::f64", skip_serializing_if = "Option::is_none")
    )]
    pub latitude: Option<f64>,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "loose::f64", skip_serializing_if = "Option::is_none")
    )]
    pub longitude: Option<f64>,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "loose::i64", skip_serializing_if = "Option::is_none")
    )]
    pub unix_time: Option<i64>,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "loose::u64", skip_serializing_if = "Option::is_none")
    )]
    pub image_length: Option<u64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub from: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub to: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub event: Option<String>,
}

impl RawRecord {
    /// Classifies this record. Positions are attributed to `agent_id`,
    /// events to their own `from` field.
    pub fn classify(&self, agent_id: &str) -> Result<Record> {
        let unix_time = self.unix_time.ok_or_else(|| malformed("missing unixTime"))?;

        if let Some(latitude) = self.latitude {
            let longitude = self
                .longitude
                .ok_or_else(|| malformed("position record missing longitude"))?;
            let image_length = self
                .image_length
                .ok_or_else(|| malformed("position record missing imageLength"))?;
            return Ok(Record::Position(PositionSample::new(
                agent_id,
                latitude,
                longitude,
                unix_time,
                image_length,
            )));
        }

        let from = self
            .from
            .as_ref()
            .ok_or_else(|| malformed("event record missing from"))?;
        let event = self
            .event
            .as_deref()
            .ok_or_else(|| malformed("event record missing event"))?;

        Ok(Record::Event(StatusEvent::new(
            from.clone(),
            self.to.clone(),
            unix_time,
            EventKind::parse(event),
        )))
    }
}

fn malformed(reason: &str) -> Error {
    Error::MalformedRecord {
        reason: reason.to_string(),
    }
}

/// A record dropped during ingestion
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    /// Position of the record in the agent's log
    pub index: usize,
    pub error: Error,
}

/// Result of ingesting one agent log
#[derive(Debug, Clone)]
pub struct Ingested {
    pub timeline: AgentTimeline,
    pub rejected: Vec<RejectedRecord>,
}

impl Ingested {
    /// Number of records that made it into the timeline
    pub fn accepted(&self) -> usize {
        self.timeline.positions().len() + self.timeline.events().len()
    }
}

/// Builds an agent timeline from its raw records.
///
/// Items that already failed upstream (e.g. while decoding) are passed in as
/// errors so they count toward the rejection report. Malformed records are
/// dropped individually; if the log is non-empty and nothing survives, the
/// whole agent fails with [`Error::AllRecordsMalformed`].
pub fn ingest<I>(agent_id: &str, records: I) -> Result<Ingested>
where
    I: IntoIterator<Item = Result<RawRecord>>,
{
    let mut positions = Vec::new();
    let mut events = Vec::new();
    let mut rejected = Vec::new();
    let mut total = 0;

    for (index, raw) in records.into_iter().enumerate() {
        total += 1;
        match raw.and_then(|r| r.classify(agent_id)) {
            Ok(Record::Position(p)) => positions.push(p),
            Ok(Record::Event(e)) => events.push(e),
            Err(error) => {
                tracing::warn!(agent = agent_id, index, %error, "dropping record");
                rejected.push(RejectedRecord { index, error });
            }
        }
    }

    if total > 0 && rejected.len() == total {
        return Err(Error::AllRecordsMalformed {
            agent: agent_id.to_string(),
            count: total,
        });
    }

    Ok(Ingested {
        timeline: AgentTimeline::new(agent_id, positions, events),
        rejected,
    })
}

/// Deserializers accepting either a JSON number or a numeric string.
///
/// Integer fields also take whole floats such as `1738800000000.0`; a
/// fractional part or an out-of-range value is an error.
#[cfg(feature = "serde")]
mod loose {
    use serde::de::{Deserializer, Error};
    use serde::Deserialize;
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose<T> {
        Value(T),
        Float(f64),
        Text(String),
    }

    trait FromFloat: Sized {
        fn from_float(v: f64) -> Option<Self>;
    }

    impl FromFloat for f64 {
        fn from_float(v: f64) -> Option<Self> {
            Some(v)
        }
    }

    impl FromFloat for i64 {
        fn from_float(v: f64) -> Option<Self> {
            // i64::MAX as f64 rounds up to 2^63, hence the strict bound
            (v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64).then_some(v as i64)
        }
    }

    impl FromFloat for u64 {
        fn from_float(v: f64) -> Option<Self> {
            (v.fract() == 0.0 && v >= 0.0 && v < u64::MAX as f64).then_some(v as u64)
        }
    }

    fn parse<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + FromStr + FromFloat,
    {
        let whole = |v: f64| {
            T::from_float(v).ok_or_else(|| D::Error::custom(format!("expected a whole number in range, got {}", v)))
        };
        match Option::<Loose<T>>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Loose::Value(v)) => Ok(Some(v)),
            Some(Loose::Float(v)) => whole(v).map(Some),
            Some(Loose::Text(s)) => {
                let s = s.trim();
                match s.parse::<T>() {
                    Ok(v) => Ok(Some(v)),
                    Err(_) => match s.parse::<f64>() {
                        Ok(v) => whole(v).map(Some),
                        Err(_) => Err(D::Error::custom(format!("invalid number {:?}", s))),
                    },
                }
            }
        }
    }

    pub fn f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        parse(d)
    }

    pub fn i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        parse(d)
    }

    pub fn u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        parse(d)
    }
}
