//! # kairos-sarima
//!
//! Seasonal ARIMA `(p, d, q) x (P, D, Q, s)` fitting, forecasting and order
//! search via state-space maximum likelihood (Kalman filter).
//!
//! ## Typestate Workflow
//!
//! ```mermaid
//! graph LR
//!     A["SarimaSpec::new(order)"] -->|".fit(&data, exog)?"| B["FittedModel"]
//!     T["train(&series, order, exog, &config)?"] -->|"retry once on singular matrix"| B
//!     G["grid_search(&data, exog, &config, progress, cancel)?"] -->|"majority of AIC/BIC/HQIC"| B
//!     B --> C[".criteria(): AIC, BIC, HQIC"]
//!     B --> D[".forecast(horizon, exog)?"]
//!     B --> E[".summary()"]
//! ```
//!
//! ## Three Usage Paths
//!
//! **Direct fit** (known order):
//! ```ignore
//! let fit = SarimaSpec::new(ModelOrder::new(1, 1, 1).with_seasonal(0, 1, 1, 12))
//!     .fit(series.values(), None)?;
//! ```
//!
//! **Training** (fallback initialisation, timestamped forecasts):
//! ```ignore
//! let model = train(&series, order, None, &TrainConfig::default())?;
//! let out = forecast(&model, series.last_timestamp(), Frequency::Monthly, 6, None, &config)?;
//! ```
//!
//! **Grid search** (unknown orders):
//! ```ignore
//! let config = GridSearchConfig::new(1, 1, 12).around(1, 1, 0, 1);
//! let outcome = grid_search(series.values(), None, &config, |_, _| {}, None)?;
//! ```
//!
//! ## Model
//!
//! ```text
//! φ(B) Φ(B^s) [δ(B) y_t - μ - Σ β_j δ(B) x_jt] = θ(B) Θ(B^s) ε_t,   δ(B) = (1 - B)^d (1 - B^s)^D
//! ```
//!
//! | Symbol | Accessor | Meaning |
//! |--------|----------|---------|
//! | φ | [`FittedModel::ar()`] | AR coefficients |
//! | θ | [`FittedModel::ma()`] | MA coefficients |
//! | Φ | [`FittedModel::seasonal_ar()`] | seasonal AR coefficients |
//! | Θ | [`FittedModel::seasonal_ma()`] | seasonal MA coefficients |
//! | μ | [`FittedModel::intercept()`] | intercept of the differenced series (drift when `d + D > 0`) |
//! | β | [`FittedModel::exog_coefficients()`] | regressor coefficients |
//! | σ² | [`FittedModel::sigma2()`] | innovation variance |

mod error;
mod exog;
mod fit;
mod forecast;
mod options;
mod order;
mod selection;
mod spec;
mod train;

pub(crate) mod kalman;
pub(crate) mod optimizer;
pub(crate) mod params;
pub(crate) mod polynomial;
pub(crate) mod state_space;

pub use error::SarimaError;
pub use exog::Exog;
pub use fit::{Criteria, FittedModel};
pub use forecast::{DEFAULT_LEVEL, Forecast};
pub use kalman::Initialization;
pub use options::FitOptions;
pub use order::ModelOrder;
pub use selection::{
    CombinationResult, GridSearchConfig, GridSearchOutcome, RunningBest, grid_search,
};
pub use spec::SarimaSpec;
pub use train::{ForecastSeries, TrainConfig, forecast, train};
