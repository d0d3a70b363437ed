//! Breathing exercise catalog.
//!
//! The exercises are fixed clinical content, not computed: the same five
//! vagus-stimulation protocols the practitioners are trained on. Durations
//! are kept in milliseconds because resonance breathing uses half-second
//! phases (5.5 s in / 5.5 s out).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreathPhase {
    Idle,
    Inhale,
    Hold,
    Exhale,
    HoldAfter,
}

/// Per-phase durations for one breathing cycle. A zero duration means the
/// phase is absent from the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhasePattern {
    pub inhale_ms: u64,
    pub hold_ms: u64,
    pub exhale_ms: u64,
    pub hold_after_ms: u64,
}

impl PhasePattern {
    pub fn duration_of(&self, phase: BreathPhase) -> u64 {
        match phase {
            BreathPhase::Idle => 0,
            BreathPhase::Inhale => self.inhale_ms,
            BreathPhase::Hold => self.hold_ms,
            BreathPhase::Exhale => self.exhale_ms,
            BreathPhase::HoldAfter => self.hold_after_ms,
        }
    }

    pub fn total_ms(&self) -> u64 {
        self.inhale_ms + self.hold_ms + self.exhale_ms + self.hold_after_ms
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreathingExercise {
    pub id: String,
    pub name: String,
    pub name_he: String,
    pub description: String,
    pub description_he: String,
    pub pattern: PhasePattern,
    pub cycles: u32,
    pub benefits: Vec<String>,
    pub benefits_he: Vec<String>,
    pub level: ExerciseLevel,
}

impl BreathingExercise {
    /// Wall-clock length of a full run in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.pattern.total_ms().saturating_mul(u64::from(self.cycles))
    }
}

/// The built-in vagus-stimulation breathing protocols.
pub fn builtin_exercises() -> Vec<BreathingExercise> {
    vec![
        BreathingExercise {
            id: "diaphragmatic".into(),
            name: "Diaphragmatic Breathing".into(),
            name_he: "נשימה דיאפרגמטית".into(),
            description: "Deep belly breathing that directly stimulates the vagus nerve through diaphragm movement".into(),
            description_he: "נשימה עמוקה מהבטן שמעוררת ישירות את עצב הוואגוס דרך תנועת הסרעפת".into(),
            pattern: PhasePattern {
                inhale_ms: 4_000,
                hold_ms: 0,
                exhale_ms: 6_000,
                hold_after_ms: 0,
            },
            cycles: 10,
            benefits: vec![
                "Activates parasympathetic nervous system".into(),
                "Reduces heart rate".into(),
                "Lowers blood pressure".into(),
            ],
            benefits_he: vec![
                "מפעיל את מערכת העצבים הפאראסימפתטית".into(),
                "מוריד דופק".into(),
                "מוריד לחץ דם".into(),
            ],
            level: ExerciseLevel::Beginner,
        },
        BreathingExercise {
            id: "box-breathing".into(),
            name: "Box Breathing (4-4-4-4)".into(),
            name_he: "נשימת קופסה (4-4-4-4)".into(),
            description: "Military-grade stress reduction technique used by Navy SEALs".into(),
            description_he: "טכניקה צבאית להפחתת מתח בשימוש על ידי כוחות מיוחדים".into(),
            pattern: PhasePattern {
                inhale_ms: 4_000,
                hold_ms: 4_000,
                exhale_ms: 4_000,
                hold_after_ms: 4_000,
            },
            cycles: 8,
            benefits: vec![
                "Calms fight-or-flight response".into(),
                "Improves focus".into(),
                "Regulates HRV".into(),
            ],
            benefits_he: vec![
                "מרגיע תגובת הילחם או ברח".into(),
                "משפר ריכוז".into(),
                "מווסת HRV".into(),
            ],
            level: ExerciseLevel::Intermediate,
        },
        BreathingExercise {
            id: "4-7-8".into(),
            name: "4-7-8 Relaxation Breath".into(),
            name_he: "נשימת הרפיה 4-7-8".into(),
            description: "Dr. Andrew Weil's natural tranquilizer for the nervous system".into(),
            description_he: "מרגיע טבעי למערכת העצבים של ד\"ר אנדרו וייל".into(),
            pattern: PhasePattern {
                inhale_ms: 4_000,
                hold_ms: 7_000,
                exhale_ms: 8_000,
                hold_after_ms: 0,
            },
            cycles: 4,
            benefits: vec![
                "Natural sedative effect".into(),
                "Helps with sleep".into(),
                "Reduces anxiety".into(),
            ],
            benefits_he: vec![
                "אפקט מרגיע טבעי".into(),
                "עוזר לשינה".into(),
                "מפחית חרדה".into(),
            ],
            level: ExerciseLevel::Intermediate,
        },
        BreathingExercise {
            id: "resonance".into(),
            name: "Resonance Breathing (5.5-5.5)".into(),
            name_he: "נשימת תהודה (5.5-5.5)".into(),
            description: "Optimal HRV breathing at 5.5 breaths per minute for maximum vagal tone".into(),
            description_he: "נשימת HRV אופטימלית ב-5.5 נשימות לדקה לטונוס וואגאלי מקסימלי".into(),
            pattern: PhasePattern {
                inhale_ms: 5_500,
                hold_ms: 0,
                exhale_ms: 5_500,
                hold_after_ms: 0,
            },
            cycles: 12,
            benefits: vec![
                "Maximizes HRV coherence".into(),
                "Synchronizes heart-brain".into(),
                "Peak vagal stimulation".into(),
            ],
            benefits_he: vec![
                "ממקסם קוהרנטיות HRV".into(),
                "מסנכרן לב-מוח".into(),
                "גירוי וואגאלי מקסימלי".into(),
            ],
            level: ExerciseLevel::Advanced,
        },
        BreathingExercise {
            id: "alternate-nostril".into(),
            name: "Alternate Nostril (Nadi Shodhana)".into(),
            name_he: "נשימה מתחלפת (נאדי שודהנה)".into(),
            description: "Ancient yogic technique that balances left and right brain hemispheres".into(),
            description_he: "טכניקה יוגית עתיקה שמאזנת את חצאי הכדורים השמאליים והימניים של המוח".into(),
            pattern: PhasePattern {
                inhale_ms: 4_000,
                hold_ms: 4_000,
                exhale_ms: 4_000,
                hold_after_ms: 0,
            },
            cycles: 10,
            benefits: vec![
                "Balances nervous system".into(),
                "Clears nadis/channels".into(),
                "Improves mental clarity".into(),
            ],
            benefits_he: vec![
                "מאזן מערכת עצבים".into(),
                "מנקה נאדים/ערוצים".into(),
                "משפר בהירות מנטלית".into(),
            ],
            level: ExerciseLevel::Beginner,
        },
    ]
}

/// Look up a built-in exercise by id.
pub fn find_exercise(id: &str) -> Option<BreathingExercise> {
    builtin_exercises().into_iter().find(|e| e.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_five_exercises_with_unique_ids() {
        let exercises = builtin_exercises();
        assert_eq!(exercises.len(), 5);
        let mut ids: Vec<_> = exercises.iter().map(|e| e.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn four_seven_eight_pattern() {
        let exercise = find_exercise("4-7-8").unwrap();
        assert_eq!(exercise.pattern.inhale_ms, 4_000);
        assert_eq!(exercise.pattern.hold_ms, 7_000);
        assert_eq!(exercise.pattern.exhale_ms, 8_000);
        assert_eq!(exercise.pattern.hold_after_ms, 0);
        assert_eq!(exercise.cycles, 4);
        assert_eq!(exercise.total_duration_ms(), 76_000);
    }

    #[test]
    fn resonance_uses_half_second_phases() {
        let exercise = find_exercise("resonance").unwrap();
        assert_eq!(exercise.pattern.inhale_ms, 5_500);
        assert_eq!(exercise.pattern.exhale_ms, 5_500);
    }

    #[test]
    fn every_exercise_has_positive_cycle_time() {
        for exercise in builtin_exercises() {
            assert!(exercise.pattern.total_ms() > 0, "{}", exercise.id);
            assert!(exercise.cycles > 0, "{}", exercise.id);
        }
    }

    #[test]
    fn unknown_id_finds_nothing() {
        assert!(find_exercise("fire-breath").is_none());
    }
}
