use thiserror::Error;

#[derive(Error, Debug)]
pub enum CityError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No legal starting point: every candidate tile is water or out of range")]
    NoStartingPoint,
}

pub type Result<T> = std::result::Result<T, CityError>;
