use std::fmt::Display;

use log::debug;

use crate::common::TeamIdx;
use crate::division::Division;
use crate::error::UnknownTeam;
use crate::max_flow::{Algorithm, FlowOutcome, MaxFlow};
use crate::network::{build_elimination_network, FlowNetwork};

/// Teams that together prove another team cannot finish with the most wins.
/// Names are kept in division order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate(Vec<String>);

impl Certificate {
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }
    pub fn contains(&self, team: &str) -> bool {
        self.0.iter().any(|name| name == team)
    }
}

impl<'a> IntoIterator for &'a Certificate {
    type Item = &'a str;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, String>, fn(&'a String) -> &'a str>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().map(String::as_str as fn(&'a String) -> &'a str)
    }
}

impl Display for Certificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ ")?;
        for name in &self.0 {
            write!(f, "{name} ")?;
        }
        write!(f, "}}")
    }
}

/// A team that already has more wins than `team` can possibly reach.
pub fn trivial_elimination(division: &Division, team: TeamIdx) -> Option<TeamIdx> {
    let best = division.best_possible_wins(team);
    (0..division.number_of_teams()).find(|&i| i != team && best < i64::from(division.wins_at(i)))
}

/// Team vertices on the source side of the minimum cut, as names. `None`
/// when that side holds no team.
pub fn extract_certificate(
    division: &Division,
    network: &FlowNetwork,
    outcome: &FlowOutcome,
) -> Option<Certificate> {
    let names: Vec<String> = (0..division.number_of_teams())
        .filter(|&k| {
            network
                .team_vertex(k)
                .map_or(false, |node| outcome.is_source_side(node))
        })
        .filter_map(|k| division.name_of(k).map(str::to_owned))
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(Certificate(names))
    }
}

/// Answers elimination queries against a division with a chosen max-flow
/// strategy. Each query builds and drops its own network.
#[derive(Debug, Clone, Copy)]
pub struct Eliminator<'d, M: MaxFlow = Algorithm> {
    division: &'d Division,
    engine: M,
}

impl<'d> Eliminator<'d> {
    pub fn new(division: &'d Division) -> Self {
        Eliminator::with_engine(division, Algorithm::default())
    }
}

impl<'d, M: MaxFlow> Eliminator<'d, M> {
    pub fn with_engine(division: &'d Division, engine: M) -> Self {
        Eliminator { division, engine }
    }

    pub fn division(&self) -> &'d Division {
        self.division
    }

    pub fn is_eliminated(&self, team: &str) -> Result<bool, UnknownTeam> {
        Ok(self.certificate_of_elimination(team)?.is_some())
    }

    pub fn certificate_of_elimination(&self, team: &str) -> Result<Option<Certificate>, UnknownTeam> {
        self.certificate_of_elimination_with(team, &self.engine)
    }

    /// Like [`Eliminator::certificate_of_elimination`], with a one-off engine.
    pub fn certificate_of_elimination_with<E: MaxFlow + ?Sized>(
        &self,
        team: &str,
        engine: &E,
    ) -> Result<Option<Certificate>, UnknownTeam> {
        let x = self.division.index_of(team)?;
        if let Some(i) = trivial_elimination(self.division, x) {
            debug!("{team} trivially eliminated by team #{i}");
            return Ok(self
                .division
                .name_of(i)
                .map(|name| Certificate(vec![name.to_owned()])));
        }
        let (network, outcome) = self.solve(x, engine);
        let certificate = extract_certificate(self.division, &network, &outcome);
        debug!(
            "{team}: flow {} of {} games, certificate of {} teams",
            outcome.value,
            network.total_source_capacity(),
            certificate.as_ref().map_or(0, Certificate::len)
        );
        Ok(certificate)
    }

    /// Runs the flow computation for `team` regardless of trivial
    /// elimination and hands back the saturated network with its cut.
    pub fn max_flow(&self, team: &str) -> Result<(FlowNetwork, FlowOutcome), UnknownTeam> {
        let x = self.division.index_of(team)?;
        Ok(self.solve(x, &self.engine))
    }

    fn solve<E: MaxFlow + ?Sized>(&self, x: TeamIdx, engine: &E) -> (FlowNetwork, FlowOutcome) {
        let mut network = build_elimination_network(self.division, x);
        let outcome = engine.max_flow(&mut network);
        (network, outcome)
    }
}

impl Division {
    pub fn is_eliminated(&self, team: &str) -> Result<bool, UnknownTeam> {
        Eliminator::new(self).is_eliminated(team)
    }

    pub fn certificate_of_elimination(&self, team: &str) -> Result<Option<Certificate>, UnknownTeam> {
        Eliminator::new(self).certificate_of_elimination(team)
    }
}

#[cfg(test)]
mod tests {
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::division::tests::textbook;
    use crate::division::TeamRecord;

    fn lettered() -> Division {
        Division::new(
            4,
            [
                TeamRecord::new("A", 83, 71, 8, vec![0, 1, 6, 1]),
                TeamRecord::new("B", 80, 79, 3, vec![1, 0, 2, 0]),
                TeamRecord::new("C", 78, 78, 6, vec![6, 2, 0, 0]),
                TeamRecord::new("D", 77, 82, 3, vec![1, 0, 0, 0]),
            ],
        )
        .unwrap()
    }

    fn detroit() -> Division {
        Division::new(
            5,
            [
                TeamRecord::new("New_York", 75, 59, 28, vec![0, 3, 8, 7, 3]),
                TeamRecord::new("Baltimore", 71, 63, 28, vec![3, 0, 2, 7, 7]),
                TeamRecord::new("Boston", 69, 66, 27, vec![8, 2, 0, 0, 3]),
                TeamRecord::new("Toronto", 63, 72, 27, vec![7, 7, 0, 0, 3]),
                TeamRecord::new("Detroit", 49, 86, 27, vec![3, 7, 3, 3, 0]),
            ],
        )
        .unwrap()
    }

    fn names(certificate: Option<Certificate>) -> Option<Vec<String>> {
        certificate.map(|c| c.iter().map(str::to_owned).collect())
    }

    /// Enumerates every outcome of the games not involving `x`, with `x`
    /// winning everything it plays and the others losing games outside the
    /// division. Only meaningful for consistent divisions.
    fn brute_force_eliminated(division: &Division, x: TeamIdx) -> bool {
        let n = division.number_of_teams();
        let best = division.best_possible_wins(x);
        let pairs: Vec<(TeamIdx, TeamIdx)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .filter(|&(i, j)| i != x && j != x)
            .collect();
        let mut totals: Vec<i64> = (0..n).map(|k| i64::from(division.wins_at(k))).collect();
        fn search(
            division: &Division,
            pairs: &[(TeamIdx, TeamIdx)],
            totals: &mut Vec<i64>,
            best: i64,
            x: TeamIdx,
        ) -> bool {
            let Some((&(i, j), rest)) = pairs.split_first() else {
                return totals.iter().enumerate().all(|(k, &w)| k == x || w <= best);
            };
            let games = i64::from(division.against_at(i, j));
            for i_wins in 0..=games {
                totals[i] += i_wins;
                totals[j] += games - i_wins;
                let feasible = search(division, rest, totals, best, x);
                totals[i] -= i_wins;
                totals[j] -= games - i_wins;
                if feasible {
                    return true;
                }
            }
            false
        }
        !search(division, &pairs, &mut totals, best, x)
    }

    fn random_division(rng: &mut ChaCha8Rng) -> Division {
        let n = rng.gen_range(1..=5);
        let mut against = vec![vec![0u32; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let games = rng.gen_range(0..=2);
                against[i][j] = games;
                against[j][i] = games;
            }
        }
        let records: Vec<TeamRecord> = (0..n)
            .map(|i| {
                let scheduled: u32 = against[i].iter().sum();
                let outside = rng.gen_range(0..=2);
                TeamRecord::new(
                    format!("T{i}"),
                    rng.gen_range(0..12),
                    rng.gen_range(0..12),
                    scheduled + outside,
                    against[i].clone(),
                )
            })
            .collect();
        Division::new(n, records).unwrap()
    }

    #[test]
    fn test_lettered_division() {
        let division = lettered();
        assert!(!division.is_eliminated("A").unwrap());
        assert!(!division.is_eliminated("C").unwrap());
        assert!(division.is_eliminated("B").unwrap());
        assert!(division.is_eliminated("D").unwrap());
        assert!(division.certificate_of_elimination("B").unwrap().unwrap().contains("A"));
        assert_eq!(names(division.certificate_of_elimination("D").unwrap()), Some(vec!["A".to_owned()]));
    }

    #[test]
    fn test_textbook_division() {
        let division = textbook();
        let eliminator = Eliminator::new(&division);
        assert_eq!(eliminator.certificate_of_elimination("Atlanta").unwrap(), None);
        assert_eq!(eliminator.certificate_of_elimination("New_York").unwrap(), None);
        assert_eq!(
            names(eliminator.certificate_of_elimination("Philadelphia").unwrap()),
            Some(vec!["Atlanta".to_owned(), "New_York".to_owned()])
        );
        assert_eq!(
            names(eliminator.certificate_of_elimination("Montreal").unwrap()),
            Some(vec!["Atlanta".to_owned()])
        );
    }

    #[test]
    fn test_detroit_needs_four_teams() {
        let division = detroit();
        for algorithm in Algorithm::ALL {
            let eliminator = Eliminator::with_engine(&division, algorithm);
            let certificate = eliminator.certificate_of_elimination("Detroit").unwrap().unwrap();
            assert_eq!(
                certificate.iter().collect::<Vec<_>>(),
                vec!["New_York", "Baltimore", "Boston", "Toronto"]
            );
            assert_eq!(certificate.to_string(), "{ New_York Baltimore Boston Toronto }");
            for team in ["New_York", "Baltimore", "Boston", "Toronto"] {
                assert!(!eliminator.is_eliminated(team).unwrap(), "{team} with {algorithm}");
            }
        }
    }

    #[test]
    fn test_certificate_iterates_names() {
        let certificate = detroit().certificate_of_elimination("Detroit").unwrap().unwrap();
        let by_ref: Vec<&str> = (&certificate).into_iter().collect();
        assert_eq!(by_ref, certificate.iter().collect::<Vec<_>>());
        let mut looped = Vec::new();
        for name in &certificate {
            looped.push(name);
        }
        assert_eq!(looped, vec!["New_York", "Baltimore", "Boston", "Toronto"]);
    }

    #[test]
    fn test_unknown_team() {
        let division = textbook();
        let eliminator = Eliminator::new(&division);
        assert_eq!(eliminator.is_eliminated("Boston"), Err(UnknownTeam::new("Boston")));
        assert_eq!(eliminator.certificate_of_elimination("Boston"), Err(UnknownTeam::new("Boston")));
        assert!(eliminator.max_flow("Boston").is_err());
    }

    #[test]
    fn test_no_games_left() {
        let division = Division::new(
            3,
            [
                TeamRecord::new("A", 10, 2, 0, vec![0, 0, 0]),
                TeamRecord::new("B", 10, 2, 0, vec![0, 0, 0]),
                TeamRecord::new("C", 8, 4, 0, vec![0, 0, 0]),
            ],
        )
        .unwrap();
        assert_eq!(division.certificate_of_elimination("A").unwrap(), None);
        assert_eq!(division.certificate_of_elimination("B").unwrap(), None);
        assert_eq!(names(division.certificate_of_elimination("C").unwrap()), Some(vec!["A".to_owned()]));
    }

    #[test]
    fn test_single_team() {
        let division = Division::new(1, [TeamRecord::new("Solo", 3, 4, 0, vec![0])]).unwrap();
        assert!(!division.is_eliminated("Solo").unwrap());
    }

    #[test]
    fn test_concurrent_queries() {
        let division = &detroit();
        let teams: Vec<String> = division.teams().map(str::to_owned).collect();
        let results: Vec<bool> = std::thread::scope(|scope| {
            let handles: Vec<_> = teams
                .iter()
                .map(|team| scope.spawn(move || division.is_eliminated(team).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(results, vec![false, false, false, false, true]);
    }

    #[test]
    fn test_trivial_elimination() {
        let division = textbook();
        assert_eq!(trivial_elimination(&division, 3), Some(0));
        assert_eq!(trivial_elimination(&division, 1), None);
        assert_eq!(trivial_elimination(&division, 0), None);
    }

    #[test]
    fn test_flow_matches_cut() {
        let division = detroit();
        let eliminator = Eliminator::new(&division);
        for team in ["New_York", "Baltimore", "Boston", "Toronto", "Detroit"] {
            let (network, outcome) = eliminator.max_flow(team).unwrap();
            assert_eq!(network.cut_capacity(&outcome.source_side), outcome.value);
            assert_eq!(network.flow_value(), outcome.value);
            let complete = outcome.value == network.total_source_capacity();
            assert_eq!(complete, !eliminator.is_eliminated(team).unwrap(), "{team}");
        }
    }

    #[test]
    fn test_random_divisions_against_brute_force() {
        for seed in 0..300 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let division = random_division(&mut rng);
            let teams: Vec<String> = division.teams().map(str::to_owned).collect();
            for (x, team) in teams.iter().enumerate() {
                let expected = brute_force_eliminated(&division, x);
                let certificates: Vec<Option<Certificate>> = Algorithm::ALL
                    .iter()
                    .map(|algorithm| {
                        Eliminator::with_engine(&division, *algorithm)
                            .certificate_of_elimination(team)
                            .unwrap()
                    })
                    .collect();
                for certificate in &certificates {
                    assert_eq!(certificate, &certificates[0], "seed {seed} team {team}");
                }
                assert_eq!(certificates[0].is_some(), expected, "seed {seed} team {team}");
                let Some(certificate) = &certificates[0] else {
                    continue;
                };
                assert!(!certificate.contains(team));
                let best = division.best_possible_wins(x);
                let members: Vec<TeamIdx> =
                    certificate.iter().map(|name| division.index_of(name).unwrap()).collect();
                if let [i] = members[..] {
                    assert!(best < i64::from(division.wins_at(i)), "seed {seed} team {team}");
                }
                // pigeonhole: the members cannot all stay at or below `best`
                let wins: i64 = members.iter().map(|&i| i64::from(division.wins_at(i))).sum();
                let games: i64 = members
                    .iter()
                    .flat_map(|&i| members.iter().map(move |&j| (i, j)))
                    .filter(|(i, j)| i < j)
                    .map(|(i, j)| i64::from(division.against_at(i, j)))
                    .sum();
                assert!(wins + games > best * members.len() as i64, "seed {seed} team {team}");
            }
        }
    }
}
