use std::fmt::Display;

use crate::elimination::{Certificate, Eliminator};
use crate::error::UnknownTeam;
use crate::max_flow::MaxFlow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamStatus {
    NotEliminated { team: String },
    Eliminated { team: String, certificate: Certificate },
}

impl TeamStatus {
    pub fn team(&self) -> &str {
        match self {
            TeamStatus::NotEliminated { team } | TeamStatus::Eliminated { team, .. } => team,
        }
    }
    pub fn is_eliminated(&self) -> bool {
        matches!(self, TeamStatus::Eliminated { .. })
    }
}

impl Display for TeamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamStatus::NotEliminated { team } => write!(f, "{team} is not eliminated"),
            TeamStatus::Eliminated { team, certificate } => {
                write!(f, "{team} is eliminated by the subset R = {certificate}")
            }
        }
    }
}

/// Elimination status of several teams, one line each when displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EliminationReport(Vec<TeamStatus>);

impl EliminationReport {
    /// Every team of the division, in division order.
    pub fn for_division<M: MaxFlow>(eliminator: &Eliminator<'_, M>) -> Result<Self, UnknownTeam> {
        let statuses = eliminator
            .division()
            .teams()
            .map(|team| status(eliminator, team))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EliminationReport(statuses))
    }

    /// The given teams, in the given order. Fails on the first unknown name
    /// before evaluating anything.
    pub fn for_teams<M: MaxFlow, S: AsRef<str>>(
        eliminator: &Eliminator<'_, M>,
        teams: &[S],
    ) -> Result<Self, UnknownTeam> {
        for team in teams {
            eliminator.division().index_of(team.as_ref())?;
        }
        let statuses = teams
            .iter()
            .map(|team| status(eliminator, team.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EliminationReport(statuses))
    }

    pub fn statuses(&self) -> &[TeamStatus] {
        &self.0
    }
}

fn status<M: MaxFlow>(eliminator: &Eliminator<'_, M>, team: &str) -> Result<TeamStatus, UnknownTeam> {
    let team = team.to_owned();
    Ok(match eliminator.certificate_of_elimination(&team)? {
        Some(certificate) => TeamStatus::Eliminated { team, certificate },
        None => TeamStatus::NotEliminated { team },
    })
}

impl Display for EliminationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for status in &self.0 {
            writeln!(f, "{status}")?;
        }
        Ok(())
    }
}
