#![deny(clippy::print_stdout, clippy::print_stderr, clippy::unwrap_used)]

//! Used to communicate with the Canvas REST API. See the CanvasClient struct for more details.
//!
//! ```rust,no_run
//! use canvas_tools_client::{CanvasClient, ClientSettings, response::Assignment};
//!
//! let settings = ClientSettings::new("https://canvas.example.com/api/v1/".parse().unwrap(), "token");
//! let client = CanvasClient::new(settings).unwrap();
//! for assignment in client.fetch::<Assignment, _>("courses/9/assignments", &[], |_| true).unwrap() {
//!     println!("{:?}", assignment);
//! }
//! ```
//!

mod client;
mod error;
pub mod filter;
pub mod request;
pub mod response;

pub use self::{
    client::{
        api_v1, is_mutation_success, CanvasClient, ClientSettings, MutationOutcome, Mutator,
        PageLimits, Paginated,
    },
    error::{CanvasClientError, CanvasClientResult},
};
// these types are part of canvas-tools-client's API and thus re-exported
pub use reqwest::StatusCode;
pub use url::Url;
