pub const STAR_WARS: &str = "StarWarsScore";
pub const ARMAGEDDON: &str = "ArmageddonScore";
pub const SLEEPLESS_IN_SEATTLE: &str = "SleeplessInSeattleScore";

/// Score columns in feature order.
pub const COLUMNS: [&str; 3] = [STAR_WARS, ARMAGEDDON, SLEEPLESS_IN_SEATTLE];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreferenceRecord {
	pub star_wars_score: f32,
	pub armageddon_score: f32,
	pub sleepless_in_seattle_score: f32,

	/// Whether the person likes Die Hard. Only set on training records.
	pub likes_die_hard: Option<bool>,
}

impl PreferenceRecord {
	pub fn new(star_wars_score: f32, armageddon_score: f32, sleepless_in_seattle_score: f32) -> Self {
		Self {
			star_wars_score,
			armageddon_score,
			sleepless_in_seattle_score,
			likes_die_hard: None,
		}
	}

	pub fn labeled(mut self, likes_die_hard: bool) -> Self {
		self.likes_die_hard = Some(likes_die_hard);
		self
	}

	pub fn column(&self, name: &str) -> Option<f64> {
		match name {
			STAR_WARS => Some(self.star_wars_score as f64),
			ARMAGEDDON => Some(self.armageddon_score as f64),
			SLEEPLESS_IN_SEATTLE => Some(self.sleepless_in_seattle_score as f64),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
	pub predicted_label: bool,
	pub score: f64,
}

pub fn die_hard_lover() -> PreferenceRecord {
	PreferenceRecord::new(8.0, 10.0, 1.0).labeled(true)
}

pub fn die_hard_hater() -> PreferenceRecord {
	PreferenceRecord::new(1.0, 1.0, 9.0).labeled(false)
}

pub fn first_user() -> PreferenceRecord {
	PreferenceRecord::new(7.0, 9.0, 0.0)
}

pub fn second_user() -> PreferenceRecord {
	PreferenceRecord::new(0.0, 0.0, 10.0)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn columns_follow_feature_order() {
		let record = die_hard_lover();
		let values = COLUMNS.iter()
			.map(|name| record.column(name))
			.collect::<Option<Vec<f64>>>();

		assert_eq!(values, Some(vec![8.0, 10.0, 1.0]));
		assert_eq!(record.column("Titanic"), None);
	}

	#[test]
	fn inference_records_are_unlabeled() {
		assert_eq!(first_user().likes_die_hard, None);
		assert_eq!(second_user().likes_die_hard, None);
		assert_eq!(die_hard_hater().likes_die_hard, Some(false));
	}
}
