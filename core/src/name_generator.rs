//! Deterministic student name generation from fixed name pools.
//!
//! First names are drawn from the pool matching the student's gender;
//! students with an unknown gender draw from both pools combined.

use crate::rng::SimRng;

const MALE_FIRST_NAMES: &[&str] = &[
    "James", "John", "Michael", "David", "Chris", "Daniel", "Matthew", "Anthony",
    "Joshua", "Andrew", "Kevin", "Brian", "Ryan", "Jacob", "Nicholas", "Eric",
    "Jonathan", "Justin", "Brandon", "Samuel", "Jose", "Juan", "Tyler", "Aaron",
    "Nathan", "Kyle", "Noah", "Ethan", "Dylan", "Jordan", "Gabriel", "Elijah",
    "Logan", "Mason", "Luis", "Carlos", "Wei", "Arjun", "Malik", "Andre",
];

const FEMALE_FIRST_NAMES: &[&str] = &[
    "Mary", "Linda", "Jennifer", "Susan", "Elizabeth", "Jessica", "Sarah", "Ashley",
    "Emily", "Michelle", "Amanda", "Melissa", "Stephanie", "Rebecca", "Laura", "Nicole",
    "Samantha", "Rachel", "Hannah", "Olivia", "Megan", "Lauren", "Victoria", "Madison",
    "Abigail", "Sophia", "Grace", "Natalie", "Brittany", "Kayla", "Alexis", "Emma",
    "Ava", "Mia", "Isabella", "Maria", "Priya", "Mei", "Aaliyah", "Jasmine",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
    "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson",
    "Thomas", "Taylor", "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson",
    "White", "Harris", "Sanchez", "Clark", "Ramirez", "Lewis", "Robinson",
    "Walker", "Young", "Allen", "King", "Wright", "Scott", "Torres", "Nguyen",
    "Hill", "Flores", "Green", "Adams", "Nelson", "Baker", "Hall", "Rivera",
    "Campbell", "Mitchell", "Carter", "Roberts", "Patel", "Kim", "Chen", "Tran",
    "Washington", "Okafor", "Singh", "Cruz", "Reyes", "Morales",
];

pub struct NameGenerator;

impl NameGenerator {
    /// Draw a first name for a student of the given gender. One draw.
    pub fn first_name(rng: &mut SimRng, gender: &str) -> &'static str {
        match gender {
            "Male" => *rng.pick(MALE_FIRST_NAMES),
            "Female" => *rng.pick(FEMALE_FIRST_NAMES),
            _ => {
                let total = MALE_FIRST_NAMES.len() + FEMALE_FIRST_NAMES.len();
                let i = rng.next_u64_below(total as u64) as usize;
                MALE_FIRST_NAMES
                    .get(i)
                    .copied()
                    .unwrap_or_else(|| FEMALE_FIRST_NAMES[i - MALE_FIRST_NAMES.len()])
            }
        }
    }

    /// Draw a last name. One draw.
    pub fn last_name(rng: &mut SimRng) -> &'static str {
        *rng.pick(LAST_NAMES)
    }
}
