pub mod call;
pub mod card;
pub mod deck;
pub mod hand;
pub mod player;
pub mod rank;
pub mod round;
pub mod score;
pub mod seating;
pub mod suit;
pub mod trick;
