//! Exercise catalog vocabulary and the built-in seed catalog

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coarse body region an exercise trains
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Legs,
    Arms,
    Core,
    FullBody,
}

impl MuscleGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "chest",
            MuscleGroup::Back => "back",
            MuscleGroup::Shoulders => "shoulders",
            MuscleGroup::Legs => "legs",
            MuscleGroup::Arms => "arms",
            MuscleGroup::Core => "core",
            MuscleGroup::FullBody => "full_body",
        }
    }

    /// All muscle groups for iteration
    pub fn all() -> &'static [MuscleGroup] {
        &[
            MuscleGroup::Chest,
            MuscleGroup::Back,
            MuscleGroup::Shoulders,
            MuscleGroup::Legs,
            MuscleGroup::Arms,
            MuscleGroup::Core,
            MuscleGroup::FullBody,
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Compound,
    Isolation,
    Bodyweight,
    Cardio,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Compound => "compound",
            Category::Isolation => "isolation",
            Category::Bodyweight => "bodyweight",
            Category::Cardio => "cardio",
        }
    }

    pub fn all() -> &'static [Category] {
        &[Category::Compound, Category::Isolation, Category::Bodyweight, Category::Cardio]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    Barbell,
    Dumbbell,
    Cable,
    Machine,
    Bodyweight,
}

impl Equipment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Equipment::Barbell => "barbell",
            Equipment::Dumbbell => "dumbbell",
            Equipment::Cable => "cable",
            Equipment::Machine => "machine",
            Equipment::Bodyweight => "bodyweight",
        }
    }

    pub fn all() -> &'static [Equipment] {
        &[
            Equipment::Barbell,
            Equipment::Dumbbell,
            Equipment::Cable,
            Equipment::Machine,
            Equipment::Bodyweight,
        ]
    }
}

/// Returned when a stored classification string is outside the vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue(pub String);

impl fmt::Display for UnknownValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value '{}'", self.0)
    }
}

impl std::error::Error for UnknownValue {}

macro_rules! vocabulary {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let key = s.trim().to_lowercase();
                <$ty>::all()
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == key)
                    .ok_or_else(|| UnknownValue(s.to_string()))
            }
        }
    };
}

vocabulary!(MuscleGroup);
vocabulary!(Category);
vocabulary!(Equipment);

/// Canonical catalog row as stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub aliases: Vec<String>,
    pub muscle_group: Option<MuscleGroup>,
    pub category: Option<Category>,
    pub equipment: Option<Equipment>,
}

/// Built-in catalog entry inserted by `SqliteCatalog::seed`
#[derive(Debug, Clone)]
pub struct SeedExercise {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub muscle_group: MuscleGroup,
    pub category: Category,
    pub equipment: Equipment,
}

const fn seed(
    name: &'static str,
    aliases: &'static [&'static str],
    muscle_group: MuscleGroup,
    category: Category,
    equipment: Equipment,
) -> SeedExercise {
    SeedExercise {
        name,
        aliases,
        muscle_group,
        category,
        equipment,
    }
}

pub const SEED_EXERCISES: &[SeedExercise] = &[
    // Chest
    seed(
        "Barbell Bench Press",
        &["Bench Press", "Bench", "Flat Bench", "BB Bench"],
        MuscleGroup::Chest,
        Category::Compound,
        Equipment::Barbell,
    ),
    seed(
        "Incline Barbell Bench Press",
        &["Incline Bench", "Incline Press", "Incline BB Bench"],
        MuscleGroup::Chest,
        Category::Compound,
        Equipment::Barbell,
    ),
    seed(
        "Dumbbell Bench Press",
        &["DB Bench Press", "DB Bench", "Flat DB Bench"],
        MuscleGroup::Chest,
        Category::Compound,
        Equipment::Dumbbell,
    ),
    seed(
        "Incline Dumbbell Bench Press",
        &["Incline DB Bench", "Incline DB Press"],
        MuscleGroup::Chest,
        Category::Compound,
        Equipment::Dumbbell,
    ),
    seed(
        "Dumbbell Fly",
        &["DB Fly", "Chest Fly", "Flat Fly"],
        MuscleGroup::Chest,
        Category::Isolation,
        Equipment::Dumbbell,
    ),
    seed(
        "Cable Crossover",
        &["Cable Fly", "Cable Chest Fly"],
        MuscleGroup::Chest,
        Category::Isolation,
        Equipment::Cable,
    ),
    seed(
        "Chest Dip",
        &["Dip", "Weighted Dip"],
        MuscleGroup::Chest,
        Category::Compound,
        Equipment::Bodyweight,
    ),
    seed(
        "Machine Chest Press",
        &["Chest Press Machine", "Seated Chest Press"],
        MuscleGroup::Chest,
        Category::Compound,
        Equipment::Machine,
    ),
    seed(
        "Pec Deck",
        &["Pec Deck Fly", "Machine Fly"],
        MuscleGroup::Chest,
        Category::Isolation,
        Equipment::Machine,
    ),

    // Back
    seed(
        "Conventional Deadlift",
        &["Deadlift", "DL"],
        MuscleGroup::Back,
        Category::Compound,
        Equipment::Barbell,
    ),
    seed(
        "Sumo Deadlift",
        &["Sumo DL"],
        MuscleGroup::Back,
        Category::Compound,
        Equipment::Barbell,
    ),
    seed(
        "Romanian Deadlift",
        &["RDL", "Stiff Leg Deadlift"],
        MuscleGroup::Back,
        Category::Compound,
        Equipment::Barbell,
    ),
    seed(
        "Barbell Row",
        &["Bent Over Row", "BB Row", "Barbell Bent Over Row"],
        MuscleGroup::Back,
        Category::Compound,
        Equipment::Barbell,
    ),
    seed(
        "Dumbbell Row",
        &["DB Row", "Single Arm Row", "One Arm DB Row"],
        MuscleGroup::Back,
        Category::Compound,
        Equipment::Dumbbell,
    ),
    seed(
        "Pull-Up",
        &["Pullup", "Pull Up", "Weighted Pull-Up"],
        MuscleGroup::Back,
        Category::Bodyweight,
        Equipment::Bodyweight,
    ),
    seed(
        "Chin-Up",
        &["Chinup", "Chin Up", "Weighted Chin-Up"],
        MuscleGroup::Back,
        Category::Bodyweight,
        Equipment::Bodyweight,
    ),
    seed(
        "Lat Pulldown",
        &["Lat Pull Down", "Cable Pulldown", "Wide Grip Pulldown"],
        MuscleGroup::Back,
        Category::Compound,
        Equipment::Cable,
    ),
    seed(
        "Seated Cable Row",
        &["Cable Row", "Seated Row"],
        MuscleGroup::Back,
        Category::Compound,
        Equipment::Cable,
    ),
    seed(
        "T-Bar Row",
        &["T Bar Row", "Landmine Row"],
        MuscleGroup::Back,
        Category::Compound,
        Equipment::Barbell,
    ),
    seed(
        "Face Pull",
        &["Cable Face Pull"],
        MuscleGroup::Back,
        Category::Isolation,
        Equipment::Cable,
    ),

    // Shoulders
    seed(
        "Overhead Press",
        &["OHP", "Shoulder Press", "Military Press", "Standing Press"],
        MuscleGroup::Shoulders,
        Category::Compound,
        Equipment::Barbell,
    ),
    seed(
        "Dumbbell Shoulder Press",
        &["DB Shoulder Press", "Seated DB Press", "DB OHP"],
        MuscleGroup::Shoulders,
        Category::Compound,
        Equipment::Dumbbell,
    ),
    seed(
        "Arnold Press",
        &["Arnold Dumbbell Press"],
        MuscleGroup::Shoulders,
        Category::Compound,
        Equipment::Dumbbell,
    ),
    seed(
        "Lateral Raise",
        &["Side Raise", "DB Lateral Raise", "Side Lateral Raise"],
        MuscleGroup::Shoulders,
        Category::Isolation,
        Equipment::Dumbbell,
    ),
    seed(
        "Front Raise",
        &["DB Front Raise", "Dumbbell Front Raise"],
        MuscleGroup::Shoulders,
        Category::Isolation,
        Equipment::Dumbbell,
    ),
    seed(
        "Reverse Fly",
        &["Rear Delt Fly", "Reverse Dumbbell Fly", "Bent Over Reverse Fly"],
        MuscleGroup::Shoulders,
        Category::Isolation,
        Equipment::Dumbbell,
    ),
    seed(
        "Upright Row",
        &["Barbell Upright Row", "Cable Upright Row"],
        MuscleGroup::Shoulders,
        Category::Compound,
        Equipment::Barbell,
    ),

    // Legs
    seed(
        "Barbell Back Squat",
        &["Back Squat", "Squat", "BB Squat"],
        MuscleGroup::Legs,
        Category::Compound,
        Equipment::Barbell,
    ),
    seed(
        "Front Squat",
        &["Barbell Front Squat", "BB Front Squat"],
        MuscleGroup::Legs,
        Category::Compound,
        Equipment::Barbell,
    ),
    seed(
        "Goblet Squat",
        &["DB Goblet Squat", "Kettlebell Goblet Squat"],
        MuscleGroup::Legs,
        Category::Compound,
        Equipment::Dumbbell,
    ),
    seed(
        "Bulgarian Split Squat",
        &["BSS", "Rear Foot Elevated Split Squat"],
        MuscleGroup::Legs,
        Category::Compound,
        Equipment::Dumbbell,
    ),
    seed(
        "Leg Press",
        &["Machine Leg Press", "45 Degree Leg Press"],
        MuscleGroup::Legs,
        Category::Compound,
        Equipment::Machine,
    ),
    seed(
        "Hack Squat",
        &["Machine Hack Squat"],
        MuscleGroup::Legs,
        Category::Compound,
        Equipment::Machine,
    ),
    seed(
        "Leg Extension",
        &["Machine Leg Extension", "Quad Extension"],
        MuscleGroup::Legs,
        Category::Isolation,
        Equipment::Machine,
    ),
    seed(
        "Leg Curl",
        &["Lying Leg Curl", "Hamstring Curl", "Seated Leg Curl"],
        MuscleGroup::Legs,
        Category::Isolation,
        Equipment::Machine,
    ),
    seed(
        "Walking Lunge",
        &["Lunge", "DB Walking Lunge", "Dumbbell Lunge"],
        MuscleGroup::Legs,
        Category::Compound,
        Equipment::Dumbbell,
    ),
    seed(
        "Calf Raise",
        &["Standing Calf Raise", "Machine Calf Raise"],
        MuscleGroup::Legs,
        Category::Isolation,
        Equipment::Machine,
    ),
    seed(
        "Seated Calf Raise",
        &["Seated Calf"],
        MuscleGroup::Legs,
        Category::Isolation,
        Equipment::Machine,
    ),
    seed(
        "Hip Thrust",
        &["Barbell Hip Thrust", "Glute Bridge"],
        MuscleGroup::Legs,
        Category::Compound,
        Equipment::Barbell,
    ),
    seed(
        "Good Morning",
        &["Barbell Good Morning"],
        MuscleGroup::Legs,
        Category::Compound,
        Equipment::Barbell,
    ),

    // Arms - Biceps
    seed(
        "Barbell Curl",
        &["BB Curl", "Standing Barbell Curl", "Bicep Curl"],
        MuscleGroup::Arms,
        Category::Isolation,
        Equipment::Barbell,
    ),
    seed(
        "Dumbbell Curl",
        &["DB Curl", "Standing DB Curl", "Bicep DB Curl"],
        MuscleGroup::Arms,
        Category::Isolation,
        Equipment::Dumbbell,
    ),
    seed(
        "Hammer Curl",
        &["DB Hammer Curl", "Dumbbell Hammer Curl"],
        MuscleGroup::Arms,
        Category::Isolation,
        Equipment::Dumbbell,
    ),
    seed(
        "Incline Dumbbell Curl",
        &["Incline DB Curl", "Incline Curl"],
        MuscleGroup::Arms,
        Category::Isolation,
        Equipment::Dumbbell,
    ),
    seed(
        "Preacher Curl",
        &["EZ Bar Preacher Curl", "Machine Preacher Curl"],
        MuscleGroup::Arms,
        Category::Isolation,
        Equipment::Barbell,
    ),
    seed(
        "Cable Curl",
        &["Cable Bicep Curl", "Standing Cable Curl"],
        MuscleGroup::Arms,
        Category::Isolation,
        Equipment::Cable,
    ),
    seed(
        "Concentration Curl",
        &["Seated Concentration Curl", "DB Concentration Curl"],
        MuscleGroup::Arms,
        Category::Isolation,
        Equipment::Dumbbell,
    ),

    // Arms - Triceps
    seed(
        "Tricep Pushdown",
        &["Cable Pushdown", "Rope Pushdown", "Tricep Cable Pushdown"],
        MuscleGroup::Arms,
        Category::Isolation,
        Equipment::Cable,
    ),
    seed(
        "Overhead Tricep Extension",
        &["Tricep Extension", "Cable Overhead Extension", "DB Overhead Extension"],
        MuscleGroup::Arms,
        Category::Isolation,
        Equipment::Cable,
    ),
    seed(
        "Skull Crusher",
        &["Lying Tricep Extension", "EZ Bar Skull Crusher"],
        MuscleGroup::Arms,
        Category::Isolation,
        Equipment::Barbell,
    ),
    seed(
        "Close Grip Bench Press",
        &["CGBP", "Close Grip BP", "Narrow Grip Bench"],
        MuscleGroup::Arms,
        Category::Compound,
        Equipment::Barbell,
    ),
    seed(
        "Tricep Dip",
        &["Bench Dip", "Bodyweight Tricep Dip"],
        MuscleGroup::Arms,
        Category::Bodyweight,
        Equipment::Bodyweight,
    ),

    // Core
    seed(
        "Plank",
        &["Front Plank", "Forearm Plank"],
        MuscleGroup::Core,
        Category::Bodyweight,
        Equipment::Bodyweight,
    ),
    seed(
        "Hanging Leg Raise",
        &["Leg Raise", "Hanging Knee Raise"],
        MuscleGroup::Core,
        Category::Bodyweight,
        Equipment::Bodyweight,
    ),
    seed(
        "Cable Crunch",
        &["Kneeling Cable Crunch"],
        MuscleGroup::Core,
        Category::Isolation,
        Equipment::Cable,
    ),
    seed(
        "Ab Wheel Rollout",
        &["Ab Roller", "Ab Wheel"],
        MuscleGroup::Core,
        Category::Bodyweight,
        Equipment::Bodyweight,
    ),
    seed(
        "Russian Twist",
        &["Weighted Russian Twist"],
        MuscleGroup::Core,
        Category::Bodyweight,
        Equipment::Bodyweight,
    ),
    seed(
        "Dead Bug",
        &[],
        MuscleGroup::Core,
        Category::Bodyweight,
        Equipment::Bodyweight,
    ),

    // Cardio
    seed(
        "Treadmill Run",
        &["Treadmill", "Running"],
        MuscleGroup::FullBody,
        Category::Cardio,
        Equipment::Machine,
    ),
    seed(
        "Rowing Machine",
        &["Rower", "Erg", "Indoor Row"],
        MuscleGroup::FullBody,
        Category::Cardio,
        Equipment::Machine,
    ),
    seed(
        "Assault Bike",
        &["Air Bike", "Fan Bike"],
        MuscleGroup::FullBody,
        Category::Cardio,
        Equipment::Machine,
    ),
    seed(
        "Battle Ropes",
        &["Battle Rope", "Rope Slams"],
        MuscleGroup::FullBody,
        Category::Cardio,
        Equipment::Bodyweight,
    ),
];
