pub mod genre;
pub mod movie;
pub mod session;
pub mod validation;

pub use genre::{Genre, UnknownGenre, GENRES};
pub use movie::{
    ImageAttachment, Movie, MovieForm, MovieListResponse, Pagination, DEFAULT_PER_PAGE,
};
pub use session::{Membership, Role, Session};
pub use validation::{
    validate_email, validate_password, validate_phone, ValidationError, MIN_PASSWORD_LEN,
};
