use euchre_core::model::call::{CallTemplate, CallType};
use euchre_core::model::card::Card;
use euchre_core::model::deck::Deck;
use euchre_core::model::hand::{HAND_SIZE, Hand};
use euchre_core::model::player::{PLAYER_COUNT, Player, PlayerId};
use euchre_core::model::suit::Suit;
use euchre_core::sim::RoundSimulation;
use euchre_core::sim::games::GameSimulation;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

/// Upper bound on trials or games per run.
pub const MAX_SIMULATION_QUANTITY: u32 = 1_000_000;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root simulation configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SimulationConfig {
    pub run_id: String,
    #[serde(default)]
    pub seed: Option<u64>,
    pub quantity: u32,
    #[serde(default)]
    pub mode: RunMode,
    #[serde(default)]
    pub round: RoundConfig,
    #[serde(default)]
    pub game: GameConfig,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: SimulationConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        validate_quantity(self.quantity)?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        match self.mode {
            RunMode::Round => self.round_simulation().map(|_| ()),
            RunMode::Game => self.game_simulation().map(|_| ()),
        }
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            summary_json: resolve_template(&self.run_id, &self.outputs.summary_json),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
            rounds_jsonl: resolve_template(&self.run_id, &self.outputs.rounds_jsonl),
            games_jsonl: resolve_template(&self.run_id, &self.outputs.games_jsonl),
        }
    }

    /// The engine request for round mode, with every name resolved and every
    /// cross-field rule checked.
    pub fn round_simulation(&self) -> Result<RoundSimulation, ValidationError> {
        let players = self.round.players()?;
        let held = collect_held_cards(&players)?;

        let call = self.round.call_template(&players)?;
        let dealer = lookup_player(&players, "round.dealer", &self.round.dealer)?;
        let flipped_card = parse_optional_card("round.flipped_card", &self.round.flipped_card)?;

        match flipped_card {
            Some(flipped) => check_flipped_card(&players, &held, flipped, call.as_ref(), dealer)?,
            None => check_turnable_suit(&held, call.as_ref())?,
        }

        Ok(RoundSimulation {
            players,
            call,
            flipped_card,
            dealer,
            quantity: self.quantity,
            keep_rounds: self.round.keep_rounds,
        })
    }

    /// The engine request for game mode; fixed hands do not apply to whole games.
    pub fn game_simulation(&self) -> Result<GameSimulation, ValidationError> {
        let mut players = self.round.players()?;
        for player in &mut players {
            player.hand.clear();
        }
        Ok(GameSimulation {
            players,
            quantity: self.quantity,
            keep_games: self.game.keep_games,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    #[default]
    Round,
    Game,
}

/// The table and call for round mode. Empty strings leave a field random.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoundConfig {
    /// Clockwise from seat 1.
    pub player_names: Vec<String>,
    pub player_hands: Vec<Vec<String>>,
    pub dealer: String,
    pub flipped_card: String,
    pub caller: String,
    pub call_suit: String,
    pub call_type: String,
    pub keep_rounds: bool,
}

impl RoundConfig {
    fn players(&self) -> Result<Vec<Player>, ValidationError> {
        let mut players = Player::default_table();

        if !self.player_names.is_empty() {
            if self.player_names.len() != PLAYER_COUNT {
                return Err(invalid(
                    "round.player_names",
                    format!("number of player names must be {PLAYER_COUNT}"),
                ));
            }
            let mut seen = HashSet::new();
            for (player, name) in players.iter_mut().zip(&self.player_names) {
                let name = name.trim();
                if name.is_empty() {
                    return Err(invalid("round.player_names", "player name must not be empty"));
                }
                if !seen.insert(name.to_string()) {
                    return Err(invalid(
                        "round.player_names",
                        format!("player name '{name}' appears more than once"),
                    ));
                }
                player.name = name.to_string();
            }
        }

        if !self.player_hands.is_empty() {
            if self.player_hands.len() != PLAYER_COUNT {
                return Err(invalid(
                    "round.player_hands",
                    format!("number of player hands must be {PLAYER_COUNT}"),
                ));
            }
            for (index, (player, names)) in players.iter_mut().zip(&self.player_hands).enumerate() {
                let field = format!("round.player_hands[{index}]");
                if names.len() > HAND_SIZE {
                    return Err(invalid(
                        &field,
                        format!("player '{}' has too many cards", player.name),
                    ));
                }
                let mut cards = Vec::with_capacity(names.len());
                for name in names {
                    let card = parse_card(&field, name)?;
                    if cards.contains(&card) {
                        return Err(invalid(
                            &field,
                            format!("duplicate card '{}' for player '{}'", card.name(), player.name),
                        ));
                    }
                    cards.push(card);
                }
                player.hand = Hand::with_cards(cards);
            }
        }

        Ok(players)
    }

    fn call_template(&self, players: &[Player]) -> Result<Option<CallTemplate>, ValidationError> {
        let suit = parse_optional_suit("round.call_suit", &self.call_suit)?;
        let caller = lookup_player(players, "round.caller", &self.caller)?;
        let call_type = match self.call_type.trim() {
            "" => None,
            token => Some(
                token
                    .parse::<CallType>()
                    .map_err(|err| invalid("round.call_type", err.to_string()))?,
            ),
        };

        if suit.is_none() && caller.is_none() && call_type.is_none() {
            return Ok(None);
        }
        Ok(Some(CallTemplate {
            suit,
            call_type: call_type.unwrap_or(CallType::RegularP1),
            caller,
        }))
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub keep_games: bool,
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub summary_json: String,
    pub summary_md: String,
    pub rounds_jsonl: String,
    #[serde(default = "default_games_jsonl")]
    pub games_jsonl: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.summary_json", &self.summary_json),
            ("outputs.summary_md", &self.summary_md),
            ("outputs.rounds_jsonl", &self.rounds_jsonl),
            ("outputs.games_jsonl", &self.games_jsonl),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(label, "path must not be empty"));
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(invalid(label, "resolved path is invalid"));
            }
        }
        Ok(())
    }
}

fn default_games_jsonl() -> String {
    "out/{run_id}/games.jsonl".to_string()
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn invalid(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidField {
        field: field.to_string(),
        message: message.into(),
    }
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(invalid("run_id", "run_id must not be empty"));
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(invalid(
            "run_id",
            "run_id may only contain alphanumeric characters, '.', '_' or '-'",
        ));
    }

    Ok(())
}

fn validate_quantity(quantity: u32) -> Result<(), ValidationError> {
    if quantity == 0 {
        return Err(invalid(
            "quantity",
            format!("quantity must be a positive integer, got {quantity}"),
        ));
    }
    if quantity > MAX_SIMULATION_QUANTITY {
        return Err(invalid(
            "quantity",
            format!("quantity must not exceed {MAX_SIMULATION_QUANTITY}, got {quantity}"),
        ));
    }
    Ok(())
}

fn parse_card(field: &str, name: &str) -> Result<Card, ValidationError> {
    name.trim()
        .parse::<Card>()
        .map_err(|err| invalid(field, err.to_string()))
}

fn parse_optional_card(field: &str, name: &str) -> Result<Option<Card>, ValidationError> {
    if name.trim().is_empty() {
        return Ok(None);
    }
    parse_card(field, name).map(Some)
}

fn parse_optional_suit(field: &str, name: &str) -> Result<Option<Suit>, ValidationError> {
    if name.trim().is_empty() {
        return Ok(None);
    }
    name.trim()
        .parse::<Suit>()
        .map(Some)
        .map_err(|err| invalid(field, err.to_string()))
}

fn lookup_player(
    players: &[Player],
    field: &str,
    name: &str,
) -> Result<Option<PlayerId>, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(None);
    }
    if let Some(player) = players.iter().find(|player| player.name == name) {
        return Ok(Some(player.id));
    }
    let mut valid: Vec<&str> = players.iter().map(|player| player.name.as_str()).collect();
    valid.sort_unstable();
    Err(invalid(
        field,
        format!(
            "'{name}' does not match any player. Valid names: {}",
            valid.join(", ")
        ),
    ))
}

fn collect_held_cards(players: &[Player]) -> Result<Vec<(PlayerId, Card)>, ValidationError> {
    let mut held: Vec<(PlayerId, Card)> = Vec::new();
    for player in players {
        for card in player.hand.iter() {
            if held.iter().any(|(_, seen)| seen == card) {
                return Err(invalid(
                    "round.player_hands",
                    format!("duplicate card '{}' found across player hands", card.name()),
                ));
            }
            held.push((player.id, *card));
        }
    }
    Ok(held)
}

/// A phase-2 flipped card was turned down, so nobody may hold it. In phase 1 the dealer
/// picked it up, so only the dealer may, and the call suit must be its suit. Without a
/// call the pickup happens during the trial, so nobody may hold it either.
fn check_flipped_card(
    players: &[Player],
    held: &[(PlayerId, Card)],
    flipped: Card,
    call: Option<&CallTemplate>,
    dealer: Option<PlayerId>,
) -> Result<(), ValidationError> {
    let phase_one = call.is_some_and(|call| call.call_type.is_phase_one());
    let holder = held
        .iter()
        .find(|(_, card)| *card == flipped)
        .map(|(id, _)| *id);

    if let Some(holder) = holder {
        if !phase_one {
            return Err(invalid(
                "round.flipped_card",
                format!("flipped card '{}' is already in a player's hand", flipped.name()),
            ));
        }
        if dealer != Some(holder) {
            let name = players
                .iter()
                .find(|player| player.id == holder)
                .map_or("", |player| player.name.as_str());
            return Err(invalid(
                "round.flipped_card",
                format!(
                    "flipped card '{}' is held by non-dealer '{name}'",
                    flipped.name()
                ),
            ));
        }
    }

    if let Some(suit) = call.filter(|call| call.call_type.is_phase_one()).and_then(|call| call.suit) {
        if suit != flipped.suit {
            return Err(invalid(
                "round.call_suit",
                format!(
                    "for phase 1 calls, the call suit must match the flipped card's suit ('{}'), got '{}'",
                    flipped.suit, suit
                ),
            ));
        }
    }

    Ok(())
}

/// Without a fixed flipped card, a phase-1 suit needs an unheld card to turn up.
fn check_turnable_suit(
    held: &[(PlayerId, Card)],
    call: Option<&CallTemplate>,
) -> Result<(), ValidationError> {
    let suit = call
        .filter(|call| call.call_type.is_phase_one())
        .and_then(|call| call.suit);
    if let Some(suit) = suit {
        let unheld = Deck::remaining_after(held.iter().map(|(_, card)| card));
        if !unheld.iter().any(|card| card.suit == suit) {
            return Err(invalid(
                "round.call_suit",
                format!("every {suit} card is held, so none can be turned up for a phase 1 call"),
            ));
        }
    }
    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub summary_json: PathBuf,
    pub summary_md: PathBuf,
    pub rounds_jsonl: PathBuf,
    pub games_jsonl: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use euchre_core::model::rank::Rank;

    const BASIC_YAML: &str = r#"
run_id: "table_smoke"
seed: 7
quantity: 500
round:
  player_names: ["Ann", "Bo", "Cy", "Di"]
  player_hands:
    - ["jack_of_spades", "JC", "as"]
    - []
    - ["9h"]
    - []
  dealer: "Di"
  flipped_card: "10D"
  caller: "Ann"
  call_suit: "spades"
  call_type: "REGULAR_P2"
  keep_rounds: true
outputs:
  summary_json: "out/{run_id}/summary.json"
  summary_md: "out/{run_id}/summary.md"
  rounds_jsonl: "out/{run_id}/rounds.jsonl"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    fn parse(yaml: &str) -> SimulationConfig {
        serde_yaml::from_str(yaml).expect("parse yaml")
    }

    fn field_of(err: ValidationError) -> String {
        let ValidationError::InvalidField { field, .. } = err;
        field
    }

    fn message_of(err: ValidationError) -> String {
        let ValidationError::InvalidField { message, .. } = err;
        message
    }

    #[test]
    fn loads_and_builds_round_request() {
        let mut cfg = parse(BASIC_YAML);
        cfg.validate().expect("validate");
        assert_eq!(cfg.mode, RunMode::Round);
        assert!(cfg.logging.enable_structured);

        let request = cfg.round_simulation().expect("request");
        assert_eq!(request.quantity, 500);
        assert!(request.keep_rounds);
        assert_eq!(request.dealer, PlayerId::new(4));
        assert_eq!(request.players[0].name, "Ann");
        assert_eq!(request.players[0].hand.len(), 3);
        assert_eq!(
            request.players[2].hand.remaining_cards(),
            &[Card::new(Rank::Nine, Suit::Hearts)]
        );
        let call = request.call.expect("call");
        assert_eq!(call.suit, Some(Suit::Spades));
        assert_eq!(call.call_type, CallType::RegularP2);
        assert_eq!(call.caller, PlayerId::new(1));
        assert_eq!(request.flipped_card, Some(Card::new(Rank::Ten, Suit::Diamonds)));

        let outputs = cfg.resolved_outputs();
        assert_eq!(outputs.summary_json, PathBuf::from("out/table_smoke/summary.json"));
        assert_eq!(outputs.games_jsonl, PathBuf::from("out/table_smoke/games.jsonl"));
    }

    #[test]
    fn minimal_config_is_fully_random() {
        let mut cfg = parse(
            r#"
run_id: "r"
quantity: 10
outputs:
  summary_json: "s.json"
  summary_md: "s.md"
  rounds_jsonl: "r.jsonl"
"#,
        );
        cfg.validate().expect("validate");
        let request = cfg.round_simulation().expect("request");
        assert!(request.call.is_none());
        assert!(request.dealer.is_none());
        assert!(request.flipped_card.is_none());
        assert_eq!(request.players[3].name, "Player4");
        assert_eq!(cfg.logging.tracing_level, "info");
    }

    #[test]
    fn rejects_bad_quantity() {
        let mut cfg = parse(&BASIC_YAML.replace("quantity: 500", "quantity: 0"));
        let err = cfg.validate().expect_err("zero quantity");
        assert!(message_of(err).contains("positive integer"));

        let mut cfg = parse(&BASIC_YAML.replace("quantity: 500", "quantity: 1000001"));
        let err = cfg.validate().expect_err("too many");
        assert!(message_of(err).contains("must not exceed"));
    }

    #[test]
    fn rejects_invalid_run_id() {
        let mut cfg = parse(&BASIC_YAML.replace("table_smoke", "table smoke"));
        let err = cfg.validate().expect_err("invalid run id");
        assert_eq!(field_of(err), "run_id");
    }

    #[test]
    fn rejects_duplicate_cards_across_hands() {
        let mut cfg = parse(&BASIC_YAML.replace("[\"9h\"]", "[\"JS\"]"));
        let err = cfg.validate().expect_err("duplicate");
        assert!(message_of(err).contains("across player hands"));
    }

    #[test]
    fn rejects_duplicate_cards_within_a_hand() {
        let mut cfg = parse(&BASIC_YAML.replace("[\"9h\"]", "[\"9h\", \"nine_of_hearts\"]"));
        let err = cfg.validate().expect_err("duplicate");
        assert!(message_of(err).contains("duplicate card 'nine_of_hearts'"));
    }

    #[test]
    fn rejects_too_many_cards() {
        let mut cfg = parse(&BASIC_YAML.replace(
            "[\"9h\"]",
            "[\"9h\", \"10h\", \"qh\", \"kh\", \"ah\", \"jd\"]",
        ));
        let err = cfg.validate().expect_err("six cards");
        assert!(message_of(err).contains("too many cards"));
    }

    #[test]
    fn rejects_unknown_names() {
        let mut cfg = parse(&BASIC_YAML.replace("caller: \"Ann\"", "caller: \"Zed\""));
        let err = cfg.validate().expect_err("unknown caller");
        let message = message_of(err);
        assert!(message.contains("does not match any player"));
        assert!(message.contains("Ann, Bo, Cy, Di"));

        let mut cfg = parse(&BASIC_YAML.replace("\"10D\"", "\"11D\""));
        let err = cfg.validate().expect_err("bad card");
        assert!(message_of(err).contains("invalid card name"));

        let mut cfg = parse(&BASIC_YAML.replace("REGULAR_P2", "REGULAR"));
        let err = cfg.validate().expect_err("bad call type");
        assert_eq!(field_of(err), "round.call_type");
    }

    #[test]
    fn rejects_wrong_player_count() {
        let mut cfg = parse(&BASIC_YAML.replace("\"Cy\", \"Di\"", "\"Cy\""));
        let err = cfg.validate().expect_err("three names");
        assert!(message_of(err).contains("must be 4"));
    }

    #[test]
    fn phase_two_flipped_card_may_not_be_held() {
        let mut cfg = parse(&BASIC_YAML.replace("\"10D\"", "\"9H\""));
        let err = cfg.validate().expect_err("held flipped card");
        assert!(message_of(err).contains("already in a player's hand"));
    }

    #[test]
    fn phase_one_flipped_card_only_with_the_dealer() {
        let yaml = BASIC_YAML
            .replace("REGULAR_P2", "REGULAR_P1")
            .replace("call_suit: \"spades\"", "call_suit: \"hearts\"")
            .replace("\"10D\"", "\"9H\"");
        let mut cfg = parse(&yaml);
        let err = cfg.validate().expect_err("non-dealer holds it");
        assert!(message_of(err).contains("non-dealer 'Cy'"));

        let mut cfg = parse(&yaml.replace("dealer: \"Di\"", "dealer: \"Cy\""));
        cfg.validate().expect("dealer holds the picked-up card");
    }

    #[test]
    fn phase_one_suit_needs_an_unheld_card_to_turn() {
        let yaml = BASIC_YAML
            .replace("REGULAR_P2", "REGULAR_P1")
            .replace("flipped_card: \"10D\"", "flipped_card: \"\"")
            .replace("[\"9h\"]", "[\"9s\", \"10s\", \"qs\", \"ks\"]");
        let mut cfg = parse(&yaml);
        let err = cfg.validate().expect_err("all spades held");
        assert_eq!(field_of(err), "round.call_suit");

        let mut cfg = parse(&yaml.replace("\"qs\", ", ""));
        let request = cfg.round_simulation().expect("queen of spades can be turned");
        assert!(request.flipped_card.is_none());
    }

    #[test]
    fn phase_one_suit_must_match_flipped_card() {
        let yaml = BASIC_YAML.replace("REGULAR_P2", "LONER_P1");
        let mut cfg = parse(&yaml);
        let err = cfg.validate().expect_err("suit mismatch");
        assert_eq!(field_of(err), "round.call_suit");
    }

    #[test]
    fn game_mode_ignores_fixed_hands() {
        let mut cfg = parse(&format!("{BASIC_YAML}mode: game\ngame:\n  keep_games: true\n"));
        cfg.validate().expect("validate");
        let request = cfg.game_simulation().expect("request");
        assert!(request.keep_games);
        assert!(request.players.iter().all(|player| player.hand.is_empty()));
        assert_eq!(request.players[1].name, "Bo");
    }
}
