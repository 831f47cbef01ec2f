mod account;
mod banner;
mod category;
mod city;
mod competition;
mod competition_map;
mod competition_text;
mod country;
mod news;
mod partner;
mod participant;
mod race_duration;
mod sport_club;

pub use account::{Account, GENDERS, NewAccount, SIZES};
pub use banner::Banner;
pub use category::Category;
pub use city::City;
pub use competition::Competition;
pub use competition_map::CompetitionMap;
pub use competition_text::CompetitionText;
pub use country::Country;
pub use news::News;
pub use partner::Partner;
pub use participant::Participant;
pub use race_duration::{DurationParseError, RaceDuration};
pub use sport_club::SportClub;
