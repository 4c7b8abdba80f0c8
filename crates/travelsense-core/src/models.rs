//! Domain models for TravelSense

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Preferred climate at the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    /// Below 10°C
    Cold,
    /// 10-18°C
    Cool,
    /// 18-25°C
    Mild,
    /// Above 25°C
    Warm,
}

impl Weather {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cold => "cold",
            Self::Cool => "cool",
            Self::Mild => "mild",
            Self::Warm => "warm",
        }
    }

    pub fn all() -> &'static [Weather] {
        &[Self::Cold, Self::Cool, Self::Mild, Self::Warm]
    }
}

impl std::str::FromStr for Weather {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cold" => Ok(Self::Cold),
            "cool" => Ok(Self::Cool),
            "mild" => Ok(Self::Mild),
            "warm" => Ok(Self::Warm),
            _ => Err(format!("Unknown weather preference: {}", s)),
        }
    }
}

impl std::fmt::Display for Weather {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main activity the traveller is interested in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Beach,
    Culture,
    History,
    Urban,
    Technology,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beach => "beach",
            Self::Culture => "culture",
            Self::History => "history",
            Self::Urban => "urban",
            Self::Technology => "technology",
        }
    }

    pub fn all() -> &'static [ActivityKind] {
        &[
            Self::Beach,
            Self::Culture,
            Self::History,
            Self::Urban,
            Self::Technology,
        ]
    }
}

impl std::str::FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beach" => Ok(Self::Beach),
            "culture" => Ok(Self::Culture),
            "history" => Ok(Self::History),
            "urban" => Ok(Self::Urban),
            "technology" | "tech" => Ok(Self::Technology),
            _ => Err(format!("Unknown activity preference: {}", s)),
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validated travel preferences, immutable per request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub budget: f64,
    pub weather: Weather,
    pub activity: ActivityKind,
}

impl Preferences {
    pub fn new(budget: f64, weather: Weather, activity: ActivityKind) -> Result<Self> {
        if !budget.is_finite() || budget <= 0.0 {
            return Err(Error::Validation(format!(
                "Budget must be a positive number, got {}",
                budget
            )));
        }
        Ok(Self {
            budget,
            weather,
            activity,
        })
    }

    /// Budget in the form handed to the scorer ("2000", "1500.5")
    pub fn budget_arg(&self) -> String {
        format_amount(self.budget)
    }
}

/// Raw preferences as submitted by a client; every field may be missing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferencesInput {
    pub budget: Option<f64>,
    pub weather: Option<String>,
    pub activity: Option<String>,
}

impl PreferencesInput {
    /// Check presence of all fields and parse them into [`Preferences`]
    pub fn validate(&self) -> Result<Preferences> {
        let weather = self.weather.as_deref().filter(|s| !s.trim().is_empty());
        let activity = self.activity.as_deref().filter(|s| !s.trim().is_empty());

        let (budget, weather, activity) = match (self.budget, weather, activity) {
            (Some(b), Some(w), Some(a)) if b != 0.0 => (b, w, a),
            _ => return Err(Error::Validation("Missing required parameters".into())),
        };

        let weather: Weather = weather.parse().map_err(Error::Validation)?;
        let activity: ActivityKind = activity.parse().map_err(Error::Validation)?;

        Preferences::new(budget, weather, activity)
    }
}

/// Feature scores the scorer reports for a destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationFeatures {
    pub budget: f64,
    pub weather: String,
    pub activity: String,
    pub safety_score: f64,
    pub popularity: f64,
    pub language_barrier: f64,
    pub cuisine_rating: f64,
    pub nightlife: f64,
}

/// A ranked destination returned by the recommendation gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Unique within one result set
    pub destination: String,
    /// Percentage, 0-100
    pub match_score: f64,
    pub features: DestinationFeatures,
}

impl Recommendation {
    pub fn card(&self) -> RecommendationCard {
        RecommendationCard {
            destination: self.destination.clone(),
            match_score: format!("{:.1}%", self.match_score),
            budget: format!("${}", format_amount(self.features.budget)),
        }
    }
}

/// Display-ready summary of a recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationCard {
    pub destination: String,
    pub match_score: String,
    pub budget: String,
}

impl std::fmt::Display for RecommendationCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}  match {}  budget {}",
            self.destination, self.match_score, self.budget
        )
    }
}

/// Candidate activity suggested by the scorer for a destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySuggestion {
    pub name: String,
    pub destination_specific: String,
    /// The scorer reports hours as a number; kept as text
    #[serde(deserialize_with = "string_or_number")]
    pub duration: String,
    pub best_time: String,
    pub estimated_cost: f64,
    /// Fraction, 0-1
    pub score: f64,
}

impl ActivitySuggestion {
    /// Turn the suggestion into a day-1 activity the way the planner pre-fills it
    pub fn to_activity(&self) -> Activity {
        Activity {
            day: 1,
            time: self.best_time.clone(),
            activity: self.destination_specific.clone(),
            notes: Some(format!(
                "Duration: {}, Cost: ${}",
                self.duration,
                format_amount(self.estimated_cost)
            )),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// One planned activity in a trip itinerary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// 1-based day within the trip
    pub day: u32,
    pub time: String,
    pub activity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Activity {
    pub fn new(day: u32, time: &str, activity: &str) -> Self {
        Self {
            day,
            time: time.to_string(),
            activity: activity.to_string(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }
}

/// Budget categories of a trip plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetCategory {
    Accommodation,
    Activities,
    Food,
    Transportation,
    Misc,
}

impl BudgetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accommodation => "accommodation",
            Self::Activities => "activities",
            Self::Food => "food",
            Self::Transportation => "transportation",
            Self::Misc => "misc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Accommodation => "Accommodation",
            Self::Activities => "Activities",
            Self::Food => "Food",
            Self::Transportation => "Transportation",
            Self::Misc => "Misc",
        }
    }

    /// Share of the total budget assigned at plan creation, in percent
    pub fn default_percent(&self) -> u32 {
        match self {
            Self::Accommodation => 40,
            Self::Activities => 30,
            Self::Food => 20,
            Self::Transportation => 10,
            Self::Misc => 0,
        }
    }

    pub fn all() -> &'static [BudgetCategory] {
        &[
            Self::Accommodation,
            Self::Activities,
            Self::Food,
            Self::Transportation,
            Self::Misc,
        ]
    }
}

impl std::str::FromStr for BudgetCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accommodation" => Ok(Self::Accommodation),
            "activities" => Ok(Self::Activities),
            "food" => Ok(Self::Food),
            "transportation" => Ok(Self::Transportation),
            "misc" | "miscellaneous" => Ok(Self::Misc),
            _ => Err(format!("Unknown budget category: {}", s)),
        }
    }
}

impl std::fmt::Display for BudgetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Budget shares of a trip plan, in whole currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BudgetSplit {
    pub accommodation: i64,
    pub activities: i64,
    pub food: i64,
    pub transportation: i64,
    #[serde(alias = "miscellaneous")]
    pub misc: i64,
}

impl BudgetSplit {
    /// Split a total with the fixed 40/30/20/10/0 percentages.
    ///
    /// Each share is rounded independently, so the sum may be off by one.
    pub fn from_total(total: f64) -> Self {
        let share =
            |c: BudgetCategory| (total * f64::from(c.default_percent()) / 100.0).round() as i64;
        Self {
            accommodation: share(BudgetCategory::Accommodation),
            activities: share(BudgetCategory::Activities),
            food: share(BudgetCategory::Food),
            transportation: share(BudgetCategory::Transportation),
            misc: share(BudgetCategory::Misc),
        }
    }

    pub fn get(&self, category: BudgetCategory) -> i64 {
        match category {
            BudgetCategory::Accommodation => self.accommodation,
            BudgetCategory::Activities => self.activities,
            BudgetCategory::Food => self.food,
            BudgetCategory::Transportation => self.transportation,
            BudgetCategory::Misc => self.misc,
        }
    }

    pub fn set(&mut self, category: BudgetCategory, amount: i64) {
        match category {
            BudgetCategory::Accommodation => self.accommodation = amount,
            BudgetCategory::Activities => self.activities = amount,
            BudgetCategory::Food => self.food = amount,
            BudgetCategory::Transportation => self.transportation = amount,
            BudgetCategory::Misc => self.misc = amount,
        }
    }

    /// Categories and amounts in display order
    pub fn entries(&self) -> Vec<(BudgetCategory, i64)> {
        BudgetCategory::all()
            .iter()
            .map(|c| (*c, self.get(*c)))
            .collect()
    }

    pub fn total(&self) -> i64 {
        BudgetCategory::all().iter().map(|c| self.get(*c)).sum()
    }
}

/// The single active itinerary for one destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub destination: String,
    /// Sorted by day, then by time as a plain string
    #[serde(default)]
    pub activities: Vec<Activity>,
    pub budget: BudgetSplit,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl TripPlan {
    pub fn new(destination: &str, total_budget: f64) -> Self {
        Self {
            destination: destination.to_string(),
            activities: Vec::new(),
            budget: BudgetSplit::from_total(total_budget),
            notes: String::new(),
            start_date: None,
            end_date: None,
        }
    }
}

/// Format an amount without a trailing ".0" for whole numbers
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{}", amount as i64)
    } else {
        format!("{}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_from_str() {
        assert_eq!("warm".parse::<Weather>().unwrap(), Weather::Warm);
        assert_eq!("COLD".parse::<Weather>().unwrap(), Weather::Cold);
        assert!("tropical".parse::<Weather>().is_err());
    }

    #[test]
    fn test_activity_kind_from_str() {
        assert_eq!("beach".parse::<ActivityKind>().unwrap(), ActivityKind::Beach);
        assert_eq!(
            "Technology".parse::<ActivityKind>().unwrap(),
            ActivityKind::Technology
        );
        assert!("skiing".parse::<ActivityKind>().is_err());
    }

    #[test]
    fn test_preferences_input_missing_fields() {
        let input = PreferencesInput {
            budget: Some(2000.0),
            weather: None,
            activity: Some("beach".into()),
        };
        assert!(matches!(input.validate(), Err(Error::Validation(_))));

        let input = PreferencesInput {
            budget: None,
            weather: Some("warm".into()),
            activity: Some("beach".into()),
        };
        assert!(matches!(input.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_preferences_input_rejects_non_positive_budget() {
        let input = PreferencesInput {
            budget: Some(-50.0),
            weather: Some("warm".into()),
            activity: Some("beach".into()),
        };
        assert!(matches!(input.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_preferences_input_valid() {
        let input = PreferencesInput {
            budget: Some(2000.0),
            weather: Some("warm".into()),
            activity: Some("beach".into()),
        };
        let prefs = input.validate().unwrap();
        assert_eq!(prefs.weather, Weather::Warm);
        assert_eq!(prefs.activity, ActivityKind::Beach);
        assert_eq!(prefs.budget_arg(), "2000");
    }

    #[test]
    fn test_budget_arg_keeps_fraction() {
        let prefs = Preferences::new(1500.5, Weather::Mild, ActivityKind::Culture).unwrap();
        assert_eq!(prefs.budget_arg(), "1500.5");
    }

    #[test]
    fn test_budget_split_from_total() {
        let split = BudgetSplit::from_total(2000.0);
        assert_eq!(split.accommodation, 800);
        assert_eq!(split.activities, 600);
        assert_eq!(split.food, 400);
        assert_eq!(split.transportation, 200);
        assert_eq!(split.misc, 0);
        assert_eq!(split.total(), 2000);
    }

    #[test]
    fn test_budget_split_rounding_within_one_unit() {
        for total in [1.0, 7.0, 15.0, 999.0, 1234.0, 2001.0, 3333.0, 4999.5] {
            let split = BudgetSplit::from_total(total);
            let diff = (split.total() as f64 - total).abs();
            assert!(diff <= 1.0, "total {} split sum {}", total, split.total());
        }
    }

    #[test]
    fn test_suggestion_duration_number_or_string() {
        let json = r#"{
            "name": "Snorkeling Tour",
            "destination_specific": "Snorkeling Tour in Bali",
            "duration": 3,
            "best_time": "morning",
            "estimated_cost": 34.29,
            "score": 0.87,
            "weather": ["mild", "warm"],
            "cost_factor": 0.4
        }"#;
        let s: ActivitySuggestion = serde_json::from_str(json).unwrap();
        assert_eq!(s.duration, "3");

        let json = json.replace("\"duration\": 3", "\"duration\": \"2 hours\"");
        let s: ActivitySuggestion = serde_json::from_str(&json).unwrap();
        assert_eq!(s.duration, "2 hours");
    }

    #[test]
    fn test_suggestion_to_activity() {
        let s = ActivitySuggestion {
            name: "Beach Yoga Session".into(),
            destination_specific: "Beach Yoga Session in Bali".into(),
            duration: "1".into(),
            best_time: "morning".into(),
            estimated_cost: 57.0,
            score: 0.9,
        };
        let activity = s.to_activity();
        assert_eq!(activity.day, 1);
        assert_eq!(activity.time, "morning");
        assert_eq!(activity.notes.as_deref(), Some("Duration: 1, Cost: $57"));
    }

    #[test]
    fn test_recommendation_card() {
        let rec = Recommendation {
            destination: "Bali".into(),
            match_score: 92.5,
            features: DestinationFeatures {
                budget: 1500.0,
                weather: "warm".into(),
                activity: "beach".into(),
                safety_score: 80.0,
                popularity: 90.0,
                language_barrier: 40.0,
                cuisine_rating: 85.0,
                nightlife: 70.0,
            },
        };
        let card = rec.card();
        assert_eq!(card.match_score, "92.5%");
        assert_eq!(card.budget, "$1500");
    }

    #[test]
    fn test_trip_plan_serialization_keys() {
        let plan = TripPlan::new("Bali", 2000.0);
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["budget"]["accommodation"], 800);
        assert_eq!(json["budget"]["misc"], 0);
        assert!(json.get("start_date").is_none());
    }
}
