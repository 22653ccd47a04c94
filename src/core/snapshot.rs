//! Position snapshots from the simulation server
//!
//! `GET /coords` answers with a three-element JSON array:
//! `[{"x":..,"y":..}, {"x":..,"y":..}, {"m1":..,"m2":..}]`.
//! Positions are relative to the pendulum pivot.

use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

use super::error::{ClientError, Result};
use super::geometry::Point2D;

/// Number of tracked bobs
pub const BOB_COUNT: usize = 2;

/// Bob radii carried in the trailing metadata record.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct BobRadii {
    pub m1: f64,
    pub m2: f64,
}

impl BobRadii {
    pub fn get(&self, bob: usize) -> f64 {
        if bob == 0 {
            self.m1
        } else {
            self.m2
        }
    }
}

/// One full positional reading of both bobs. Immutable once received.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub bobs: [Point2D; BOB_COUNT],
    pub radii: BobRadii,
}

impl Snapshot {
    pub fn new(bob1: Point2D, bob2: Point2D, radii: BobRadii) -> Self {
        Self {
            bobs: [bob1, bob2],
            radii,
        }
    }
}

/// Parse a `/coords` response body.
pub fn parse_snapshot(body: &str) -> Result<Snapshot> {
    trace!(len = body.len(), "Parsing snapshot");

    let json: Value = serde_json::from_str(body)?;
    let entries = json
        .as_array()
        .ok_or_else(|| ClientError::MalformedSnapshot("expected a JSON array".into()))?;

    if entries.len() != BOB_COUNT + 1 {
        return Err(ClientError::MalformedSnapshot(format!(
            "expected {} entries, got {}",
            BOB_COUNT + 1,
            entries.len()
        )));
    }

    let bob1: Point2D = serde_json::from_value(entries[0].clone())?;
    let bob2: Point2D = serde_json::from_value(entries[1].clone())?;
    let radii: BobRadii = serde_json::from_value(entries[2].clone())?;

    Ok(Snapshot::new(bob1, bob2, radii))
}

/// Single-slot "latest value" cell between the sampler and the render loop.
///
/// Writes overwrite (last response wins, no queue). The generation counter
/// lets consumers tell a fresh snapshot from one they have already seen.
#[derive(Debug, Default)]
pub struct SnapshotSlot {
    latest: Option<Snapshot>,
    generation: u64,
}

impl SnapshotSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held snapshot atomically.
    pub fn store(&mut self, snapshot: Snapshot) {
        self.latest = Some(snapshot);
        self.generation += 1;
        trace!(generation = self.generation, "Snapshot stored");
    }

    /// Fold a poll result into the slot. Failures leave the slot untouched.
    ///
    /// Returns true if a new snapshot was stored.
    pub fn accept(&mut self, result: Result<Snapshot>) -> bool {
        match result {
            Ok(snapshot) => {
                self.store(snapshot);
                true
            }
            Err(e) => {
                trace!(error = %e, "Poll failed, keeping previous snapshot");
                false
            }
        }
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.latest.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The held snapshot if it was stored after generation `seen`.
    pub fn newer_than(&self, seen: u64) -> Option<&Snapshot> {
        if self.generation > seen {
            self.latest.as_ref()
        } else {
            None
        }
    }

    /// Drop the held snapshot so nothing is drawn until the next poll lands.
    pub fn clear(&mut self) {
        self.latest = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"[{"x": 10.5, "y": -3.0}, {"x": 20.0, "y": 4.25}, {"m1": 12, "m2": 8}]"#;

    #[test]
    fn test_parse_snapshot() {
        let snap = parse_snapshot(BODY).unwrap();
        assert_eq!(snap.bobs[0], Point2D::new(10.5, -3.0));
        assert_eq!(snap.bobs[1], Point2D::new(20.0, 4.25));
        assert_eq!(snap.radii, BobRadii { m1: 12.0, m2: 8.0 });
        assert_eq!(snap.radii.get(1), 8.0);
    }

    #[test]
    fn test_parse_requires_radii_record() {
        let body = r#"[{"x": 1, "y": 2}, {"x": 3, "y": 4}]"#;
        assert!(matches!(
            parse_snapshot(body),
            Err(ClientError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_snapshot("<html>"), Err(ClientError::Parse(_))));
        assert!(matches!(
            parse_snapshot(r#"{"x": 1}"#),
            Err(ClientError::MalformedSnapshot(_))
        ));
        assert!(parse_snapshot(r#"[{"x": 1}, {"x": 3, "y": 4}, {"m1": 1, "m2": 1}]"#).is_err());
    }

    #[test]
    fn test_slot_last_write_wins() {
        let mut slot = SnapshotSlot::new();
        assert!(slot.latest().is_none());

        let first = parse_snapshot(BODY).unwrap();
        let mut second = first.clone();
        second.bobs[0] = Point2D::new(0.0, 0.0);

        slot.store(first);
        slot.store(second.clone());
        assert_eq!(slot.latest(), Some(&second));
        assert_eq!(slot.generation(), 2);
    }

    #[test]
    fn test_slot_failure_keeps_previous() {
        let mut slot = SnapshotSlot::new();
        assert!(slot.accept(parse_snapshot(BODY)));
        assert!(!slot.accept(Err(ClientError::Status(500))));
        assert!(!slot.accept(parse_snapshot("nope")));
        assert_eq!(slot.latest(), Some(&parse_snapshot(BODY).unwrap()));
        assert_eq!(slot.generation(), 1);
    }

    #[test]
    fn test_newer_than_and_clear() {
        let mut slot = SnapshotSlot::new();
        slot.store(parse_snapshot(BODY).unwrap());
        assert!(slot.newer_than(0).is_some());
        assert!(slot.newer_than(1).is_none());

        slot.clear();
        assert!(slot.latest().is_none());
        assert!(slot.newer_than(0).is_none());
    }
}
