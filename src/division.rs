use std::collections::HashMap;
use std::fmt::Display;

use log::warn;

use crate::common::TeamIdx;
use crate::error::{DivisionError, UnknownTeam};

/// One input row: a team's standing plus its remaining games against every
/// team of the division, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRecord {
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub remaining: u32,
    pub against: Vec<u32>,
}

impl TeamRecord {
    pub fn new(name: impl Into<String>, wins: u32, losses: u32, remaining: u32, against: Vec<u32>) -> Self {
        TeamRecord {
            name: name.into(),
            wins,
            losses,
            remaining,
            against,
        }
    }
}

/// Numeric anomalies that are accepted as-is, but reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    Asymmetric { a: String, b: String, a_vs_b: u32, b_vs_a: u32 },
    SelfGames { team: String, games: u32 },
    OverScheduled { team: String, remaining: u32, scheduled: u64 },
}

impl Display for Inconsistency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Inconsistency::Asymmetric { a, b, a_vs_b, b_vs_a } => {
                write!(f, "{a} has {a_vs_b} games left against {b}, but {b} has {b_vs_a} against {a}")
            }
            Inconsistency::SelfGames { team, games } => {
                write!(f, "{team} has {games} games left against itself")
            }
            Inconsistency::OverScheduled {
                team,
                remaining,
                scheduled,
            } => write!(
                f,
                "{team} has {remaining} games remaining but {scheduled} scheduled within the division"
            ),
        }
    }
}

/// Immutable standings of a single round-robin division.
///
/// Names map to indices and back without any mutation after construction, so
/// a `Division` can be shared across threads and queried concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Division {
    names: Vec<String>,
    index: HashMap<String, TeamIdx>,
    wins: Vec<u32>,
    losses: Vec<u32>,
    remaining: Vec<u32>,
    against: Vec<Vec<u32>>,
}

impl Division {
    /// Builds a division from `team_count` records given in input order.
    ///
    /// Structural problems (wrong record count, duplicate names, opposition
    /// rows of the wrong length) are rejected. Numeric inconsistencies such as
    /// an asymmetric matrix are only logged; see [`Division::inconsistencies`].
    pub fn new<I>(team_count: usize, records: I) -> Result<Self, DivisionError>
    where
        I: IntoIterator<Item = TeamRecord>,
    {
        let mut names = Vec::new();
        let mut index = HashMap::new();
        let mut wins = Vec::new();
        let mut losses = Vec::new();
        let mut remaining = Vec::new();
        let mut against = Vec::new();
        for record in records {
            if record.against.len() != team_count {
                return Err(DivisionError::OppositionLength {
                    team: record.name,
                    expected: team_count,
                    found: record.against.len(),
                });
            }
            if index.insert(record.name.clone(), names.len()).is_some() {
                return Err(DivisionError::DuplicateTeam(record.name));
            }
            names.push(record.name);
            wins.push(record.wins);
            losses.push(record.losses);
            remaining.push(record.remaining);
            against.push(record.against);
        }
        if names.len() != team_count {
            return Err(DivisionError::TeamCountMismatch {
                expected: team_count,
                found: names.len(),
            });
        }
        let division = Division {
            names,
            index,
            wins,
            losses,
            remaining,
            against,
        };
        for inconsistency in division.inconsistencies() {
            warn!("accepting inconsistent division: {inconsistency}");
        }
        Ok(division)
    }

    pub fn number_of_teams(&self) -> usize {
        self.names.len()
    }

    /// Team names in input order.
    pub fn teams(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    pub fn index_of(&self, team: &str) -> Result<TeamIdx, UnknownTeam> {
        self.index
            .get(team)
            .copied()
            .ok_or_else(|| UnknownTeam::new(team))
    }

    pub fn name_of(&self, idx: TeamIdx) -> Option<&str> {
        self.names.get(idx).map(String::as_str)
    }

    pub fn wins(&self, team: &str) -> Result<u32, UnknownTeam> {
        Ok(self.wins[self.index_of(team)?])
    }

    pub fn losses(&self, team: &str) -> Result<u32, UnknownTeam> {
        Ok(self.losses[self.index_of(team)?])
    }

    pub fn remaining(&self, team: &str) -> Result<u32, UnknownTeam> {
        Ok(self.remaining[self.index_of(team)?])
    }

    /// Games left between `team1` and `team2`, as listed in `team1`'s row.
    pub fn against(&self, team1: &str, team2: &str) -> Result<u32, UnknownTeam> {
        let i = self.index_of(team1)?;
        let j = self.index_of(team2)?;
        Ok(self.against[i][j])
    }

    pub(crate) fn wins_at(&self, idx: TeamIdx) -> u32 {
        self.wins[idx]
    }

    pub(crate) fn remaining_at(&self, idx: TeamIdx) -> u32 {
        self.remaining[idx]
    }

    pub(crate) fn against_at(&self, i: TeamIdx, j: TeamIdx) -> u32 {
        self.against[i][j]
    }

    /// Most wins `idx` can finish with: current wins plus every remaining game.
    pub(crate) fn best_possible_wins(&self, idx: TeamIdx) -> i64 {
        i64::from(self.wins_at(idx)) + i64::from(self.remaining_at(idx))
    }

    pub fn inconsistencies(&self) -> Vec<Inconsistency> {
        let n = self.number_of_teams();
        let mut out = Vec::new();
        for i in 0..n {
            if self.against[i][i] != 0 {
                out.push(Inconsistency::SelfGames {
                    team: self.names[i].clone(),
                    games: self.against[i][i],
                });
            }
            for j in (i + 1)..n {
                if self.against[i][j] != self.against[j][i] {
                    out.push(Inconsistency::Asymmetric {
                        a: self.names[i].clone(),
                        b: self.names[j].clone(),
                        a_vs_b: self.against[i][j],
                        b_vs_a: self.against[j][i],
                    });
                }
            }
            let scheduled: u64 = self.against[i].iter().map(|&g| u64::from(g)).sum();
            if scheduled > u64::from(self.remaining[i]) {
                out.push(Inconsistency::OverScheduled {
                    team: self.names[i].clone(),
                    remaining: self.remaining[i],
                    scheduled,
                });
            }
        }
        out
    }
}
