//! Run state and the turn loop.
//!
//! A run moves through three phases: title, playing, result. Within a
//! playing turn the player first commits a policy, then one secondary
//! action; executing the action advances the turn and re-checks the
//! scenario's termination rules.
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::actions::{
    ActionKind, CfoActionKind, DiplomacyOption, ETF_SERIES_LEN, ETF_START_PRICE,
    builtin_diplomacy_options, generate_price_series,
};
use crate::advisors::{AdvisorId, AdvisorMessage, commentary, main_advisor_for};
use crate::events::{GameEvent, builtin_events, pick_event};
use crate::industry::{ActiveIndustryProject, IndustryProject, builtin_industries, tick_projects};
use crate::meters::{HiddenMeters, MeterId, Meters};
use crate::policy::{Policy, builtin_policies};
use crate::scenario::{Scenario, ScenarioId, ScenarioTheme, builtin_scenarios, danger_meters};
use crate::score::{GameResultType, RunResult};
use crate::summary::summarize_turn;

pub const BANKRUPTCY_TREASURY_FLOOR: i32 = -50;
pub const BANKRUPTCY_STREAK_TURNS: u32 = 3;
pub const FINAL_DANGER_LIMIT: usize = 2;

const BAILOUT_TREASURY_CREDIT: i32 = 40;
const BAILOUT_SUPPORT_PENALTY: i32 = 5;
const BAILOUT_CREDIT_PENALTY: i32 = 10;
const BAILOUT_RIGIDITY_GAIN: i32 = 5;

const DEBT_ISSUE_TREASURY: i32 = 30;
const DEBT_ISSUE_CREDIT_PENALTY: i32 = 5;
const DEBT_ISSUE_FUTURE_COST: i32 = 3;
const RESERVE_TREASURY_CREDIT: i32 = 20;

pub const LOG_EVENT: &str = "log.event";
pub const LOG_ACTION: &str = "log.action";
pub const LOG_BAILOUT: &str = "log.bailout";
pub const LOG_DEBT_ISSUED: &str = "log.debt_issued";
pub const LOG_RESERVE_DRAWN: &str = "log.reserve_drawn";
pub const LOG_ETF_BUY: &str = "log.etf.buy";
pub const LOG_ETF_SELL: &str = "log.etf.sell";
pub const LOG_DIPLOMACY: &str = "log.diplomacy";
pub const LOG_SURVEY: &str = "log.survey";
pub const LOG_PROJECT_STARTED: &str = "log.project_started";

const MSG_CLEARED: &str = "result.cleared";
const MSG_BANKRUPTCY_STREAK: &str = "result.bankruptcy_streak";
const MSG_FINAL_DANGER: &str = "result.final_danger";

/// Where in its lifecycle the run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    #[default]
    Title,
    Playing,
    Result,
}

/// One completed policy turn, kept for the history panel and the run
/// summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub selected_policy_id: Option<String>,
    pub main_advisor_id: Option<AdvisorId>,
    pub before_meters: Meters,
    pub after_meters: Meters,
    pub summary: String,
}

/// The builtin content registries. Not persisted: a deserialized state
/// rehydrates with the builtins.
#[derive(Debug, Clone)]
pub struct ContentData {
    pub scenarios: Vec<Scenario>,
    pub events: Vec<GameEvent>,
    pub policies: Vec<Policy>,
    pub diplomacy_options: Vec<DiplomacyOption>,
    pub industries: Vec<IndustryProject>,
}

impl Default for ContentData {
    fn default() -> Self {
        Self {
            scenarios: builtin_scenarios(),
            events: builtin_events(),
            policies: builtin_policies(),
            diplomacy_options: builtin_diplomacy_options(),
            industries: builtin_industries(),
        }
    }
}

/// The whole mutable state of one run. Persistence goes through the
/// flat save document in `save`, not through this struct directly.
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub current_scenario: Option<Scenario>,
    pub meters: Meters,
    pub hidden: HiddenMeters,
    pub turn: u32,
    pub current_event: Option<GameEvent>,
    pub history: Vec<TurnRecord>,
    pub current_summary: String,
    pub advisor_messages: Vec<AdvisorMessage>,
    pub result: Option<RunResult>,
    pub action_phase: bool,
    pub selected_action: Option<ActionKind>,
    pub action_log: Vec<String>,
    pub etf_prices: Vec<i32>,
    pub etf_holding: i32,
    pub active_projects: Vec<ActiveIndustryProject>,
    pub debt_level: i32,
    pub reserve_used: bool,
    pub deficit_streak: u32,
    pub rng: Option<ChaCha20Rng>,
    pub data: ContentData,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            phase: GamePhase::Title,
            current_scenario: None,
            meters: Meters::default(),
            hidden: HiddenMeters::default(),
            turn: 1,
            current_event: None,
            history: Vec::new(),
            current_summary: String::new(),
            advisor_messages: Vec::new(),
            result: None,
            action_phase: false,
            selected_action: None,
            action_log: Vec::new(),
            etf_prices: Vec::new(),
            etf_holding: 0,
            active_projects: Vec::new(),
            debt_level: 0,
            reserve_used: false,
            deficit_streak: 0,
            rng: None,
            data: ContentData::default(),
        }
    }
}

impl GameState {
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Some(ChaCha20Rng::seed_from_u64(seed)),
            ..Self::default()
        }
    }

    /// Theme correction to apply to player-driven deltas. Policies and
    /// events are taken at face value; actions and diplomacy lean with
    /// the chapter's theme.
    fn bonus_theme(&self) -> Option<ScenarioTheme> {
        self.current_scenario.as_ref().map(|s| s.theme)
    }

    /// Leave the title screen and begin a chapter. Run state resets; the
    /// first world event fires immediately.
    pub fn start_scenario(&mut self, id: ScenarioId) -> bool {
        let Some(scenario) = self.data.scenarios.iter().find(|s| s.id == id).cloned() else {
            return false;
        };
        let rng = self.rng.take();
        let data = std::mem::take(&mut self.data);
        *self = Self {
            rng,
            data,
            ..Self::default()
        };
        self.current_scenario = Some(scenario);
        self.phase = GamePhase::Playing;
        self.next_event();
        true
    }

    /// Draw and apply the next world event. Without an RNG the first
    /// event in the table is taken, so headless runs stay deterministic.
    pub fn next_event(&mut self) {
        let idx = match self.rng.as_mut() {
            Some(rng) => pick_event(&self.data.events, self.current_scenario.as_ref(), rng),
            None => (!self.data.events.is_empty()).then_some(0),
        };
        let Some(idx) = idx else {
            self.current_event = None;
            return;
        };
        let event = self.data.events[idx].clone();
        if let Some(effects) = &event.effects {
            // Event deltas are never theme-corrected.
            self.meters.apply(effects, None);
        }
        self.action_log.push(format!("{LOG_EVENT} {}", event.id));
        self.current_event = Some(event);
    }

    /// Commit this turn's policy: snapshot the meters, apply the policy
    /// deltas at face value, record the turn and open the action phase.
    pub fn apply_policy(&mut self, policy_id: &str) -> bool {
        if self.phase != GamePhase::Playing || self.action_phase {
            return false;
        }
        let Some(policy) = self
            .data
            .policies
            .iter()
            .find(|p| p.id == policy_id)
            .cloned()
        else {
            return false;
        };

        let before = self.meters.clone();
        if let Some(effects) = &policy.effects {
            self.meters.apply(effects, None);
        }
        let summary = summarize_turn(&before, &self.meters).to_string();
        let main_advisor = main_advisor_for(&policy);
        self.advisor_messages = commentary(&policy.id, self.rng.as_mut());
        self.current_summary = summary.clone();
        self.history.push(TurnRecord {
            turn: self.turn,
            selected_policy_id: Some(policy.id),
            main_advisor_id: Some(main_advisor),
            before_meters: before,
            after_meters: self.meters.clone(),
            summary,
        });
        self.action_phase = true;
        true
    }

    /// Choose the secondary action for this turn. Picking the ETF desk
    /// lazily seeds the price chart.
    pub fn select_action(&mut self, kind: ActionKind) -> bool {
        if !self.action_phase {
            return false;
        }
        if kind == ActionKind::Etf {
            self.initialize_etf();
        }
        self.selected_action = Some(kind);
        true
    }

    /// Execute the selected action's fixed effects, then advance the
    /// turn. Action deltas lean with the chapter's theme.
    pub fn execute_action(&mut self) -> bool {
        let Some(kind) = self.selected_action.take() else {
            return false;
        };
        let theme = self.bonus_theme();
        self.meters.apply(&kind.effects(), theme);
        self.action_log.push(format!("{LOG_ACTION} {kind}"));
        self.action_phase = false;
        self.end_turn_and_check_scenario();
        true
    }

    /// Treasury intervention taken in place of a regular action. Drawing
    /// the reserve works once per run; issuing debt always goes through.
    pub fn execute_cfo_action(&mut self, kind: CfoActionKind) -> bool {
        if !self.action_phase {
            return false;
        }
        match kind {
            CfoActionKind::IssueDebt => {
                self.meters
                    .get_mut(MeterId::Treasury)
                    .apply_delta(DEBT_ISSUE_TREASURY);
                self.debt_level += 1;
                self.hidden.credit -= DEBT_ISSUE_CREDIT_PENALTY;
                self.hidden.future_cost += DEBT_ISSUE_FUTURE_COST;
                self.action_log.push(LOG_DEBT_ISSUED.to_string());
            }
            CfoActionKind::DrawReserve => {
                if self.reserve_used {
                    return false;
                }
                self.reserve_used = true;
                self.meters
                    .get_mut(MeterId::Treasury)
                    .apply_delta(RESERVE_TREASURY_CREDIT);
                self.action_log.push(LOG_RESERVE_DRAWN.to_string());
            }
        }
        self.hidden.clamp();
        self.selected_action = None;
        self.action_phase = false;
        self.end_turn_and_check_scenario();
        true
    }

    /// Resolve a finance/diplomacy option whose success roll has already
    /// been decided, then advance the turn.
    pub fn apply_diplomacy_result(&mut self, option_id: &str, success: bool) -> bool {
        if !self.action_phase {
            return false;
        }
        let Some(option) = self
            .data
            .diplomacy_options
            .iter()
            .find(|o| o.id == option_id)
            .cloned()
        else {
            return false;
        };
        let effects = option.outcome_effects(success);
        let theme = self.bonus_theme();
        self.meters.apply(&effects.meter_part(), theme);
        self.hidden.credit += effects.credit.unwrap_or(0);
        self.hidden.support += effects.support.unwrap_or(0);
        self.hidden.inflation_risk += effects.inflation_risk.unwrap_or(0);
        self.hidden.productivity += effects.productivity.unwrap_or(0);
        self.hidden.future_cost += effects.future_cost.unwrap_or(0);
        self.hidden.clamp();
        self.action_log
            .push(format!("{LOG_DIPLOMACY} {option_id} {success}"));
        self.selected_action = None;
        self.action_phase = false;
        self.end_turn_and_check_scenario();
        true
    }

    /// Note how many citizen voices a field survey gathered. Purely a
    /// journal entry; the survey's meter effect lands via the action.
    pub fn record_survey_action(&mut self, voice_count: u32) {
        self.action_log.push(format!("{LOG_SURVEY} {voice_count}"));
    }

    /// Seed the ETF price chart if it has not been generated yet.
    pub fn initialize_etf(&mut self) {
        if self.etf_prices.is_empty() {
            self.etf_prices =
                generate_price_series(ETF_SERIES_LEN, ETF_START_PRICE, self.rng.as_mut());
        }
    }

    #[must_use]
    pub fn etf_price(&self) -> i32 {
        self.etf_prices.last().copied().unwrap_or(ETF_START_PRICE)
    }

    /// Buy one unit at the current price. Refused when the treasury
    /// cannot cover it.
    pub fn buy_etf(&mut self) -> bool {
        self.initialize_etf();
        let price = self.etf_price();
        if self.meters.value(MeterId::Treasury) < price {
            return false;
        }
        self.meters.get_mut(MeterId::Treasury).apply_delta(-price);
        self.etf_holding += 1;
        self.action_log.push(format!("{LOG_ETF_BUY} {price}"));
        true
    }

    /// Sell one unit at the current price.
    pub fn sell_etf(&mut self) -> bool {
        if self.etf_holding == 0 {
            return false;
        }
        let price = self.etf_price();
        self.meters.get_mut(MeterId::Treasury).apply_delta(price);
        self.etf_holding -= 1;
        self.action_log.push(format!("{LOG_ETF_SELL} {price}"));
        true
    }

    /// Pay for an industry project and queue it, then advance the turn.
    /// Refused when the treasury cannot cover the cost.
    pub fn start_industry_project(&mut self, project_id: &str) -> bool {
        if !self.action_phase {
            return false;
        }
        let Some(project) = self
            .data
            .industries
            .iter()
            .find(|p| p.id == project_id)
            .cloned()
        else {
            return false;
        };
        if self.meters.value(MeterId::Treasury) < project.cost {
            return false;
        }
        self.meters
            .get_mut(MeterId::Treasury)
            .apply_delta(-project.cost);
        self.action_log
            .push(format!("{LOG_PROJECT_STARTED} {project_id}"));
        self.active_projects.push(ActiveIndustryProject::start(project));
        self.selected_action = None;
        self.action_phase = false;
        self.end_turn_and_check_scenario();
        true
    }

    /// Advance the turn counter and settle everything that happens
    /// between turns, in order: project payoffs, the bankruptcy streak,
    /// turn exhaustion, the chapter's fail rule, the final chapter's
    /// composite danger rule, then the next event and a possible bailout.
    pub fn end_turn_and_check_scenario(&mut self) {
        let project_effects = tick_projects(&mut self.active_projects);
        self.meters.apply(&project_effects, None);
        self.advance_etf_price();

        self.turn += 1;

        if self.meters.value(MeterId::Treasury) <= BANKRUPTCY_TREASURY_FLOOR {
            self.deficit_streak += 1;
        } else {
            self.deficit_streak = 0;
        }
        if self.deficit_streak >= BANKRUPTCY_STREAK_TURNS {
            self.finish_run(
                GameResultType::Bankruptcy,
                MSG_BANKRUPTCY_STREAK.to_string(),
            );
            return;
        }

        let Some(scenario) = self.current_scenario.clone() else {
            return;
        };

        if self.turn > scenario.max_turns {
            self.finish_run(GameResultType::Clear, MSG_CLEARED.to_string());
            return;
        }

        if let Some(cond) = &scenario.fail_condition {
            if cond.breached(&self.meters) {
                self.finish_run(GameResultType::Fail, cond.message.clone());
                return;
            }
        }

        if scenario.id == ScenarioId::Final
            && danger_meters(&self.meters).len() >= FINAL_DANGER_LIMIT
        {
            self.finish_run(GameResultType::Fail, MSG_FINAL_DANGER.to_string());
            return;
        }

        self.next_event();

        if self.meters.value(MeterId::Treasury) < 0 {
            self.meters
                .get_mut(MeterId::Treasury)
                .apply_delta(BAILOUT_TREASURY_CREDIT);
            self.hidden.support -= BAILOUT_SUPPORT_PENALTY;
            self.hidden.credit -= BAILOUT_CREDIT_PENALTY;
            self.hidden.rigidity += BAILOUT_RIGIDITY_GAIN;
            self.hidden.clamp();
            self.action_log.push(LOG_BAILOUT.to_string());
        }
    }

    fn advance_etf_price(&mut self) {
        if self.etf_prices.is_empty() {
            return;
        }
        let next = generate_price_series(2, self.etf_price(), self.rng.as_mut())[1];
        self.etf_prices.push(next);
        if self.etf_prices.len() > ETF_SERIES_LEN {
            self.etf_prices.remove(0);
        }
    }

    fn finish_run(&mut self, result_type: GameResultType, message: String) {
        self.result = Some(RunResult::from_meters(result_type, &self.meters, message));
        self.phase = GamePhase::Result;
        self.action_phase = false;
        self.selected_action = None;
    }

    /// Back to the title screen. The RNG and content registries survive
    /// so a following run stays on the same random stream.
    pub fn reset_game(&mut self) {
        let rng = self.rng.take();
        let data = std::mem::take(&mut self.data);
        *self = Self {
            rng,
            data,
            ..Self::default()
        };
    }

    /// Throw the current run away and start the same chapter over.
    pub fn restart_current_chapter(&mut self) -> bool {
        match self.current_scenario.as_ref().map(|s| s.id) {
            Some(id) => self.start_scenario(id),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meters::{INITIAL_LIFE, INITIAL_PRICE, INITIAL_TREASURY, INITIAL_UNEMPLOYMENT};
    use crate::score::Ending;

    fn started(id: ScenarioId) -> GameState {
        let mut state = GameState::with_seed(99);
        assert!(state.start_scenario(id));
        state
    }

    fn play_one_turn(state: &mut GameState) {
        assert!(state.apply_policy("policy-5"));
        assert!(state.select_action(ActionKind::Survey));
        assert!(state.execute_action());
    }

    #[test]
    fn start_scenario_resets_and_draws_an_event() {
        let mut state = GameState::with_seed(1);
        assert!(state.start_scenario(ScenarioId::Chapter1));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.turn, 1);
        assert!(state.current_event.is_some());
        assert!(state.history.is_empty());
    }

    #[test]
    fn policy_turn_records_history_and_opens_action_phase() {
        let mut state = started(ScenarioId::Chapter2);
        let before_life = state.meters.value(MeterId::Life);
        assert!(state.apply_policy("policy-1"));
        assert!(state.action_phase);
        assert_eq!(state.history.len(), 1);
        let record = &state.history[0];
        assert_eq!(record.selected_policy_id.as_deref(), Some("policy-1"));
        assert_eq!(record.main_advisor_id, Some(AdvisorId::Riku));
        assert_eq!(record.after_meters.value(MeterId::Life), before_life + 8);
        assert_eq!(state.advisor_messages.len(), AdvisorId::ALL.len());
        // A second policy in the same turn is refused.
        assert!(!state.apply_policy("policy-2"));
    }

    #[test]
    fn unknown_policy_is_refused() {
        let mut state = started(ScenarioId::Chapter1);
        assert!(!state.apply_policy("policy-99"));
        assert!(state.history.is_empty());
    }

    #[test]
    fn executing_the_action_advances_the_turn() {
        let mut state = started(ScenarioId::Chapter2);
        play_one_turn(&mut state);
        assert_eq!(state.turn, 2);
        assert!(!state.action_phase);
        assert_eq!(state.selected_action, None);
    }

    #[test]
    fn action_without_selection_is_refused() {
        let mut state = started(ScenarioId::Chapter2);
        assert!(state.apply_policy("policy-1"));
        assert!(!state.execute_action());
        assert_eq!(state.turn, 1);
    }

    #[test]
    fn run_clears_when_turns_run_out() {
        // No RNG: every draw is the first event, which never touches the
        // treasury, so chapter 1's fail rule stays quiet.
        let mut state = GameState::default();
        assert!(state.start_scenario(ScenarioId::Chapter1));
        let max_turns = state.current_scenario.as_ref().unwrap().max_turns;
        for _ in 0..max_turns {
            assert_eq!(state.phase, GamePhase::Playing);
            play_one_turn(&mut state);
        }
        assert_eq!(state.phase, GamePhase::Result);
        let result = state.result.as_ref().unwrap();
        assert_eq!(result.result_type, GameResultType::Clear);
    }

    #[test]
    fn fail_condition_ends_the_run_with_its_message() {
        let mut state = started(ScenarioId::Chapter2);
        state.meters.get_mut(MeterId::Price).set_clamped(95);
        state.apply_policy("policy-4");
        state.select_action(ActionKind::Survey);
        state.execute_action();
        assert_eq!(state.phase, GamePhase::Result);
        let result = state.result.as_ref().unwrap();
        assert_eq!(result.result_type, GameResultType::Fail);
        assert!(result.message.contains("Hyperinflation"));
    }

    #[test]
    fn three_deep_deficit_turns_force_bankruptcy() {
        // Chapter 2's fail rule watches prices, so only the streak can
        // end this run.
        let mut state = started(ScenarioId::Chapter2);
        for i in 0..BANKRUPTCY_STREAK_TURNS {
            assert_eq!(state.phase, GamePhase::Playing, "ended early at {i}");
            state.meters.get_mut(MeterId::Treasury).set_clamped(-80);
            play_one_turn(&mut state);
        }
        assert_eq!(state.phase, GamePhase::Result);
        let result = state.result.as_ref().unwrap();
        assert_eq!(result.result_type, GameResultType::Bankruptcy);
        assert_eq!(result.ending, Ending::Bankruptcy);
    }

    #[test]
    fn treasury_held_at_the_floor_still_counts_toward_bankruptcy() {
        // -50 exactly is inside the streak band. Interest-rate policy and
        // the survey keep every other effect off the treasury, and the
        // deterministic first event never touches it.
        let mut state = GameState::default();
        assert!(state.start_scenario(ScenarioId::Chapter2));
        for i in 0..BANKRUPTCY_STREAK_TURNS {
            assert_eq!(state.phase, GamePhase::Playing, "ended early at {i}");
            state.meters.get_mut(MeterId::Treasury).set_clamped(-50);
            assert!(state.apply_policy("policy-3"));
            assert!(state.select_action(ActionKind::Survey));
            assert!(state.execute_action());
        }
        assert_eq!(state.phase, GamePhase::Result);
        assert_eq!(
            state.result.as_ref().unwrap().result_type,
            GameResultType::Bankruptcy
        );
    }

    #[test]
    fn deficit_streak_resets_on_recovery() {
        let mut state = GameState::default();
        assert!(state.start_scenario(ScenarioId::Chapter2));
        state.meters.get_mut(MeterId::Treasury).set_clamped(-80);
        play_one_turn(&mut state);
        assert_eq!(state.deficit_streak, 1);

        state.meters.get_mut(MeterId::Treasury).set_clamped(100);
        play_one_turn(&mut state);
        assert_eq!(state.deficit_streak, 0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn final_chapter_fails_on_two_danger_meters() {
        let mut state = started(ScenarioId::Final);
        state.apply_policy("policy-5");
        state.meters.get_mut(MeterId::Price).set_clamped(85);
        state.meters.get_mut(MeterId::Treasury).set_clamped(40);
        state.select_action(ActionKind::Survey);
        state.execute_action();
        assert_eq!(state.phase, GamePhase::Result);
        assert_eq!(
            state.result.as_ref().unwrap().result_type,
            GameResultType::Fail
        );
    }

    #[test]
    fn bailout_tops_up_a_negative_treasury() {
        let mut state = GameState::default();
        assert!(state.start_scenario(ScenarioId::Chapter2));
        state.meters.get_mut(MeterId::Treasury).set_clamped(-10);
        // Interest-rate policy and the survey leave the treasury alone,
        // as does the deterministically drawn first event.
        assert!(state.apply_policy("policy-3"));
        assert!(state.select_action(ActionKind::Survey));
        assert!(state.execute_action());
        assert_eq!(state.meters.value(MeterId::Treasury), 30);
        assert_eq!(state.hidden.support, 45);
        assert_eq!(state.hidden.credit, 40);
        assert_eq!(state.hidden.rigidity, 5);
        assert!(state.action_log.iter().any(|l| l == LOG_BAILOUT));
    }

    #[test]
    fn issuing_debt_trades_credibility_for_cash() {
        let mut state = started(ScenarioId::Chapter4);
        state.apply_policy("policy-4");
        assert!(state.execute_cfo_action(CfoActionKind::IssueDebt));
        assert_eq!(state.debt_level, 1);
        assert_eq!(state.hidden.credit, 45);
        assert_eq!(state.hidden.future_cost, 3);
        assert!(state.action_log.iter().any(|l| l == LOG_DEBT_ISSUED));
        assert_eq!(state.turn, 2);
    }

    #[test]
    fn reserve_draw_is_once_per_run() {
        let mut state = started(ScenarioId::Chapter4);
        state.apply_policy("policy-4");
        assert!(state.execute_cfo_action(CfoActionKind::DrawReserve));
        assert!(state.reserve_used);
        state.apply_policy("policy-4");
        assert!(!state.execute_cfo_action(CfoActionKind::DrawReserve));
        assert!(state.execute_cfo_action(CfoActionKind::IssueDebt));
    }

    #[test]
    fn diplomacy_applies_hidden_deltas_and_advances() {
        let mut state = started(ScenarioId::Chapter5);
        state.apply_policy("policy-5");
        assert!(state.apply_diplomacy_result("finance-3", true));
        assert_eq!(state.hidden.support, 55);
        assert_eq!(state.turn, 2);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn survey_voices_land_in_the_journal() {
        let mut state = started(ScenarioId::Chapter1);
        state.record_survey_action(12);
        assert!(state.action_log.iter().any(|l| l == "log.survey 12"));
    }

    #[test]
    fn etf_buy_requires_funds_and_sell_requires_holdings() {
        let mut state = started(ScenarioId::Chapter2);
        assert!(!state.sell_etf());

        state.apply_policy("policy-1");
        state.select_action(ActionKind::Etf);
        assert_eq!(state.etf_prices.len(), ETF_SERIES_LEN);

        let price = state.etf_price();
        state.meters.get_mut(MeterId::Treasury).set_clamped(price - 1);
        assert!(!state.buy_etf());
        state.meters.get_mut(MeterId::Treasury).set_clamped(price);
        assert!(state.buy_etf());
        assert_eq!(state.etf_holding, 1);
        assert_eq!(state.meters.value(MeterId::Treasury), 0);
        assert!(state.sell_etf());
        assert_eq!(state.etf_holding, 0);
        assert_eq!(state.meters.value(MeterId::Treasury), price);
    }

    #[test]
    fn industry_project_pays_off_after_its_delay() {
        let mut state = started(ScenarioId::Chapter3);
        state.apply_policy("policy-2");
        let treasury = state.meters.value(MeterId::Treasury);
        assert!(state.start_industry_project("industry-services"));
        assert_eq!(state.active_projects.len(), 1);
        // Cost lands immediately; payoff waits out the delay.
        assert!(state.meters.value(MeterId::Treasury) <= treasury - 25 + 40);
        assert_eq!(state.turn, 2);

        assert_eq!(state.active_projects[0].remaining_delay, 0);
        play_one_turn(&mut state);
        // First post-delay tick consumed one payoff turn.
        assert_eq!(state.active_projects[0].remaining_duration, 2);
    }

    #[test]
    fn project_refused_when_unaffordable() {
        let mut state = started(ScenarioId::Chapter3);
        state.apply_policy("policy-2");
        state.meters.get_mut(MeterId::Treasury).set_clamped(10);
        assert!(!state.start_industry_project("industry-manufacturing"));
        assert!(state.active_projects.is_empty());
        assert!(state.action_phase);
    }

    #[test]
    fn reset_returns_to_title_with_fresh_meters() {
        let mut state = started(ScenarioId::Chapter2);
        play_one_turn(&mut state);
        state.reset_game();
        assert_eq!(state.phase, GamePhase::Title);
        assert!(state.history.is_empty());
        assert_eq!(state.meters.value(MeterId::Price), INITIAL_PRICE);
        assert_eq!(state.meters.value(MeterId::Unemployment), INITIAL_UNEMPLOYMENT);
        assert_eq!(state.meters.value(MeterId::Life), INITIAL_LIFE);
        assert_eq!(state.meters.value(MeterId::Treasury), INITIAL_TREASURY);
        assert!(state.rng.is_some());
    }

    #[test]
    fn restart_restores_the_initial_meter_baseline() {
        let mut state = GameState::default();
        assert!(state.start_scenario(ScenarioId::Chapter1));
        play_one_turn(&mut state);
        assert!(state.restart_current_chapter());
        // The fresh chapter's first draw touches price and life only, so
        // the other meters sit exactly at their starting values.
        assert_eq!(state.meters.value(MeterId::Treasury), INITIAL_TREASURY);
        assert_eq!(state.meters.value(MeterId::Unemployment), INITIAL_UNEMPLOYMENT);
        assert_eq!(state.meters.value(MeterId::Price), INITIAL_PRICE + 20);
        assert_eq!(state.meters.value(MeterId::Life), INITIAL_LIFE - 15);
    }

    #[test]
    fn restart_replays_the_same_chapter() {
        let mut state = started(ScenarioId::Chapter5);
        play_one_turn(&mut state);
        assert!(state.restart_current_chapter());
        assert_eq!(
            state.current_scenario.as_ref().map(|s| s.id),
            Some(ScenarioId::Chapter5)
        );
        assert_eq!(state.turn, 1);
        assert!(state.history.is_empty());
    }
}
