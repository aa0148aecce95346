//! The probe checklist.
//!
//! Steps run strictly in order, each awaiting its response before the next
//! request goes out:
//!
//! 1. Swagger UI is reachable (status 200)
//! 2. A fresh `user_XXXXXX@demo.com` registers
//! 3. That user logs in and receives a bearer token
//! 4. With a token: add product 101 x2, list the cart, delete the line,
//!    list again and expect an empty cart
//!
//! A failed check is recorded and the run goes on. An errored step is
//! recorded and ends the run.

use shop_probe_core::{ProbeReport, ProductId, Step, StepOutcome, StepResult};
use tracing::{error, info, instrument};

use crate::client::ShopApiClient;
use crate::config::ProbeConfig;
use crate::error::ProbeError;
use crate::identity::Identity;

/// Product added to and removed from the cart.
pub const CART_PRODUCT_ID: ProductId = ProductId::new(101);

/// Quantity of [`CART_PRODUCT_ID`] added to the cart.
pub const CART_QUANTITY: i32 = 2;

/// Runs the checklist against one target.
#[derive(Debug, Clone)]
pub struct ProbeRunner {
    client: ShopApiClient,
}

impl ProbeRunner {
    /// Create a runner for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ProbeConfig) -> Result<Self, ProbeError> {
        Ok(Self {
            client: ShopApiClient::new(config)?,
        })
    }

    /// Run the checklist with a freshly generated identity.
    pub async fn run(&self) -> ProbeReport {
        match Identity::generate() {
            Ok(identity) => self.run_as(&identity).await,
            Err(e) => {
                let mut report = ProbeReport::new(self.client.config().base_url());
                record_error(&mut report, Step::Register, &ProbeError::from(e));
                report
            }
        }
    }

    /// Run the checklist registering and logging in as `identity`.
    #[instrument(skip(self, identity), fields(base_url = %self.client.config().base_url(), email = %identity.email))]
    pub async fn run_as(&self, identity: &Identity) -> ProbeReport {
        let mut report = ProbeReport::new(self.client.config().base_url());
        self.walk(identity, &mut report).await;
        info!(
            steps = report.steps.len(),
            failures = report.failure_count(),
            aborted = report.aborted,
            cart_skipped = report.cart_skipped,
            "Probe finished"
        );
        report
    }

    async fn walk(&self, identity: &Identity, report: &mut ProbeReport) {
        let api = &self.client;

        // Documentation
        let Some(status) = settle(report, Step::SwaggerReachable, api.swagger_status().await)
        else {
            return;
        };
        report.record(StepResult::new(
            Step::SwaggerReachable,
            StepOutcome::from_check(status.as_u16() == 200),
        ));

        // Registration and login
        let Some(registered) = settle(report, Step::Register, api.register(identity).await) else {
            return;
        };
        report.record(
            StepResult::new(Step::Register, StepOutcome::from_check(registered))
                .with_detail(identity.email.as_str()),
        );

        let Some(session) = settle(report, Step::Login, api.login(identity).await) else {
            return;
        };
        report.record(StepResult::new(
            Step::Login,
            StepOutcome::from_check(session.is_authenticated()),
        ));

        if !session.is_authenticated() {
            info!("No bearer token, skipping cart steps");
            report.cart_skipped = true;
            return;
        }

        // Cart cycle
        let Some(added) = settle(
            report,
            Step::AddToCart,
            api.add_to_cart(&session, CART_PRODUCT_ID, CART_QUANTITY).await,
        ) else {
            return;
        };
        report.record(StepResult::new(
            Step::AddToCart,
            StepOutcome::from_check(added),
        ));

        let Some(cart) = settle(report, Step::QueryCart, api.cart(&session).await) else {
            return;
        };
        report.record(
            StepResult::new(Step::QueryCart, StepOutcome::from_check(cart.ok))
                .with_detail(cart.body_json()),
        );

        let Some(removed) = settle(
            report,
            Step::DeleteCartItem,
            api.remove_from_cart(&session, CART_PRODUCT_ID).await,
        ) else {
            return;
        };
        report.record(StepResult::new(
            Step::DeleteCartItem,
            StepOutcome::from_check(removed),
        ));

        let Some(cart) = settle(report, Step::VerifyCartEmpty, api.cart(&session).await) else {
            return;
        };
        report.record(StepResult::new(
            Step::VerifyCartEmpty,
            StepOutcome::from_check(cart.is_empty_cart()),
        ));
    }
}

/// Unwrap a step's result, recording an errored step on failure.
fn settle<T>(report: &mut ProbeReport, step: Step, result: Result<T, ProbeError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            record_error(report, step, &e);
            None
        }
    }
}

fn record_error(report: &mut ProbeReport, step: Step, e: &ProbeError) {
    error!(step = %step, error = %e, timeout = e.is_timeout(), "Probe step errored");
    report.record(StepResult::new(step, StepOutcome::Errored(e.to_string())));
}
