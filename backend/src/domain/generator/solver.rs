//! Index-level roster solver.
//!
//! Doctors and days are plain indices here. Each day must be staffed by
//! exactly `required` distinct available doctors. The solver:
//!
//! 1. finds the smallest per-doctor load cap that still staffs every day,
//!    using max-flow (source → doctor → day → sink) and a binary search,
//! 2. moves shifts from the busiest to the least busy doctors until loads
//!    differ by at most one wherever availability allows,
//! 3. swaps shifts between doctors to break up back-to-back working days
//!    without changing anybody's load.
//!
//! Adjacency order is shuffled with the caller's RNG so distinct seeds
//! explore distinct optimal rosters.

use std::collections::VecDeque;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

const STREAK_PASSES: usize = 8;

/// Staffing demand of one day.
#[derive(Debug, Clone)]
pub(super) struct DayDemand {
    pub available: Vec<usize>,
    pub required: usize,
}

/// Reasons the solver stops without a roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SolveError {
    /// The time budget ran out.
    Expired,
    /// Some day cannot be staffed even without a load cap.
    Unstaffable,
}

/// Cooperative cancellation point for the search.
#[derive(Debug, Clone, Copy)]
pub(super) struct Deadline(Option<Instant>);

impl Deadline {
    pub fn at(instant: Instant) -> Self {
        Self(Some(instant))
    }

    #[cfg(test)]
    pub fn none() -> Self {
        Self(None)
    }

    fn check(&self) -> Result<(), SolveError> {
        match self.0 {
            Some(limit) if Instant::now() >= limit => Err(SolveError::Expired),
            _ => Ok(()),
        }
    }
}

/// Doctor × day assignment matrix.
#[derive(Debug, Clone)]
pub(super) struct Roster {
    assigned: Vec<Vec<bool>>,
    load: Vec<usize>,
}

impl Roster {
    fn empty(doctor_count: usize, day_count: usize) -> Self {
        Self {
            assigned: vec![vec![false; day_count]; doctor_count],
            load: vec![0; doctor_count],
        }
    }

    fn assign(&mut self, doctor: usize, day: usize) {
        self.assigned[doctor][day] = true;
        self.load[doctor] += 1;
    }

    fn unassign(&mut self, doctor: usize, day: usize) {
        self.assigned[doctor][day] = false;
        self.load[doctor] -= 1;
    }

    pub fn is_assigned(&self, doctor: usize, day: usize) -> bool {
        self.assigned[doctor][day]
    }

    pub fn loads(&self) -> &[usize] {
        &self.load
    }

    fn streaks(&self, doctor: usize) -> usize {
        self.assigned[doctor]
            .windows(2)
            .filter(|pair| pair[0] && pair[1])
            .count()
    }
}

struct FlowNetwork {
    adjacency: Vec<Vec<usize>>,
    target: Vec<usize>,
    capacity: Vec<u32>,
}

impl FlowNetwork {
    fn with_nodes(count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); count],
            target: Vec::new(),
            capacity: Vec::new(),
        }
    }

    fn add_edge(&mut self, from: usize, to: usize, capacity: u32) -> usize {
        let forward = self.target.len();
        self.adjacency[from].push(forward);
        self.target.push(to);
        self.capacity.push(capacity);
        self.adjacency[to].push(forward + 1);
        self.target.push(from);
        self.capacity.push(0);
        forward
    }

    fn levels(&self, source: usize) -> Vec<Option<usize>> {
        let mut level = vec![None; self.adjacency.len()];
        level[source] = Some(0);
        let mut queue = VecDeque::from([source]);
        while let Some(node) = queue.pop_front() {
            let next_level = level[node].map(|value| value + 1);
            for &edge in &self.adjacency[node] {
                let to = self.target[edge];
                if self.capacity[edge] > 0 && level[to].is_none() {
                    level[to] = next_level;
                    queue.push_back(to);
                }
            }
        }
        level
    }

    fn augment(
        &mut self,
        node: usize,
        sink: usize,
        pushed: u32,
        level: &[Option<usize>],
        cursor: &mut [usize],
    ) -> u32 {
        if node == sink {
            return pushed;
        }
        while cursor[node] < self.adjacency[node].len() {
            let edge = self.adjacency[node][cursor[node]];
            let to = self.target[edge];
            let advances = level[to].is_some() && level[to] == level[node].map(|value| value + 1);
            if self.capacity[edge] > 0 && advances {
                let flow = self.augment(to, sink, pushed.min(self.capacity[edge]), level, cursor);
                if flow > 0 {
                    self.capacity[edge] -= flow;
                    self.capacity[edge ^ 1] += flow;
                    return flow;
                }
            }
            cursor[node] += 1;
        }
        0
    }

    /// Dinic's algorithm.
    fn max_flow(
        &mut self,
        source: usize,
        sink: usize,
        deadline: &Deadline,
    ) -> Result<u32, SolveError> {
        let mut total = 0;
        loop {
            deadline.check()?;
            let level = self.levels(source);
            if level[sink].is_none() {
                return Ok(total);
            }
            let mut cursor = vec![0; self.adjacency.len()];
            loop {
                let pushed = self.augment(source, sink, u32::MAX, &level, &mut cursor);
                if pushed == 0 {
                    break;
                }
                total += pushed;
            }
        }
    }
}

/// Problem instance with a fixed, shuffled edge order.
struct Instance<'a> {
    doctor_count: usize,
    days: &'a [DayDemand],
    doctor_order: Vec<usize>,
    day_order: Vec<usize>,
    availability: Vec<Vec<usize>>,
    total_required: usize,
}

impl<'a> Instance<'a> {
    fn new(doctor_count: usize, days: &'a [DayDemand], rng: &mut SmallRng) -> Self {
        let mut doctor_order: Vec<usize> = (0..doctor_count).collect();
        doctor_order.shuffle(rng);
        let mut day_order: Vec<usize> = (0..days.len()).collect();
        day_order.shuffle(rng);
        let mut availability = vec![Vec::new(); doctor_count];
        for &day in &day_order {
            for &doctor in &days[day].available {
                availability[doctor].push(day);
            }
        }
        let total_required = days.iter().map(|day| day.required).sum();
        Self {
            doctor_count,
            days,
            doctor_order,
            day_order,
            availability,
            total_required,
        }
    }

    /// Staff every day with each doctor working at most `cap` days.
    fn staff_with_cap(
        &self,
        cap: usize,
        deadline: &Deadline,
    ) -> Result<Option<Roster>, SolveError> {
        let day_count = self.days.len();
        let source = 0;
        let sink = self.doctor_count + day_count + 1;
        let doctor_node = |doctor: usize| doctor + 1;
        let day_node = |day: usize| self.doctor_count + day + 1;

        let mut network = FlowNetwork::with_nodes(sink + 1);
        let cap = u32::try_from(cap).unwrap_or(u32::MAX);
        let mut shift_edges = Vec::new();
        for &doctor in &self.doctor_order {
            network.add_edge(source, doctor_node(doctor), cap);
            for &day in &self.availability[doctor] {
                let edge = network.add_edge(doctor_node(doctor), day_node(day), 1);
                shift_edges.push((doctor, day, edge));
            }
        }
        for &day in &self.day_order {
            let required = u32::try_from(self.days[day].required).unwrap_or(u32::MAX);
            network.add_edge(day_node(day), sink, required);
        }

        let flow = network.max_flow(source, sink, deadline)?;
        if usize::try_from(flow).ok() != Some(self.total_required) {
            return Ok(None);
        }

        let mut roster = Roster::empty(self.doctor_count, day_count);
        for (doctor, day, edge) in shift_edges {
            if network.capacity[edge] == 0 {
                roster.assign(doctor, day);
            }
        }
        Ok(Some(roster))
    }
}

/// Produce a roster meeting every day's `required` count exactly.
///
/// Callers must ensure each day has at least `required` available doctors.
pub(super) fn solve(
    doctor_count: usize,
    days: &[DayDemand],
    rng: &mut SmallRng,
    deadline: &Deadline,
) -> Result<Roster, SolveError> {
    deadline.check()?;
    let instance = Instance::new(doctor_count, days, rng);
    if doctor_count == 0 || instance.total_required == 0 {
        return Ok(Roster::empty(doctor_count, days.len()));
    }

    let mut low = instance.total_required.div_ceil(doctor_count);
    let mut high = days.len().max(low);
    let mut best = None;
    while low < high {
        let mid = low + (high - low) / 2;
        match instance.staff_with_cap(mid, deadline)? {
            Some(roster) => {
                best = Some(roster);
                high = mid;
            }
            None => low = mid + 1,
        }
    }
    // `best` holds the roster of the last successful probe, which ran at `low`.
    let mut roster = match best {
        Some(roster) => roster,
        None => instance
            .staff_with_cap(low, deadline)?
            .ok_or(SolveError::Unstaffable)?,
    };

    level_loads(&mut roster, days, deadline)?;
    break_streaks(&mut roster, days, deadline)?;
    Ok(roster)
}

fn availability_matrix(doctor_count: usize, days: &[DayDemand]) -> Vec<Vec<bool>> {
    let mut matrix = vec![vec![false; days.len()]; doctor_count];
    for (day, demand) in days.iter().enumerate() {
        for &doctor in &demand.available {
            matrix[doctor][day] = true;
        }
    }
    matrix
}

/// Move single shifts from heavier to lighter doctors.
///
/// Each move lowers the sum of squared loads, so the loop terminates.
fn level_loads(
    roster: &mut Roster,
    days: &[DayDemand],
    deadline: &Deadline,
) -> Result<(), SolveError> {
    let doctor_count = roster.load.len();
    let available = availability_matrix(doctor_count, days);
    loop {
        deadline.check()?;
        let mut by_load: Vec<usize> = (0..doctor_count).collect();
        by_load.sort_by_key(|&doctor| roster.load[doctor]);

        let mut moved = None;
        'search: for &heavy in by_load.iter().rev() {
            for &light in &by_load {
                if roster.load[heavy] < roster.load[light] + 2 {
                    break;
                }
                for day in 0..days.len() {
                    if roster.is_assigned(heavy, day)
                        && available[light][day]
                        && !roster.is_assigned(light, day)
                    {
                        moved = Some((heavy, light, day));
                        break 'search;
                    }
                }
            }
        }

        match moved {
            Some((heavy, light, day)) => {
                roster.unassign(heavy, day);
                roster.assign(light, day);
            }
            None => return Ok(()),
        }
    }
}

/// Swap shift pairs between doctors when it reduces back-to-back days.
fn break_streaks(
    roster: &mut Roster,
    days: &[DayDemand],
    deadline: &Deadline,
) -> Result<(), SolveError> {
    let doctor_count = roster.load.len();
    let day_count = days.len();
    let available = availability_matrix(doctor_count, days);

    for _ in 0..STREAK_PASSES {
        let mut improved = false;
        for first in 0..doctor_count {
            deadline.check()?;
            if roster.streaks(first) == 0 {
                continue;
            }
            for give in 0..day_count {
                if !roster.is_assigned(first, give) {
                    continue;
                }
                if let Some((second, take)) =
                    find_streak_swap(roster, &available, first, give, day_count)
                {
                    roster.unassign(first, give);
                    roster.assign(first, take);
                    roster.unassign(second, take);
                    roster.assign(second, give);
                    improved = true;
                }
            }
        }
        if !improved {
            break;
        }
    }
    Ok(())
}

fn find_streak_swap(
    roster: &mut Roster,
    available: &[Vec<bool>],
    first: usize,
    give: usize,
    day_count: usize,
) -> Option<(usize, usize)> {
    for second in 0..roster.load.len() {
        if second == first || !available[second][give] || roster.is_assigned(second, give) {
            continue;
        }
        for take in 0..day_count {
            if take == give
                || !roster.is_assigned(second, take)
                || !available[first][take]
                || roster.is_assigned(first, take)
            {
                continue;
            }
            let before = roster.streaks(first) + roster.streaks(second);
            roster.assigned[first][give] = false;
            roster.assigned[first][take] = true;
            roster.assigned[second][take] = false;
            roster.assigned[second][give] = true;
            let after = roster.streaks(first) + roster.streaks(second);
            roster.assigned[first][give] = true;
            roster.assigned[first][take] = false;
            roster.assigned[second][take] = true;
            roster.assigned[second][give] = false;
            if after < before {
                return Some((second, take));
            }
        }
    }
    None
}
