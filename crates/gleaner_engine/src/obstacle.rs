use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use gleaner_core::{contains_any, ObstacleConfig};

use crate::browser::{BrowserError, BrowserSession};
use crate::pacing::pause;

/// What the obstacle pass did, for logging and tests. Never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObstacleReport {
    pub popup_suspected: bool,
    pub popup_closed: bool,
    pub hold_performed: bool,
}

/// Best-effort removal of pop-ups and press-and-hold challenges.
#[derive(Debug, Clone)]
pub struct ObstacleHandler {
    config: ObstacleConfig,
}

impl ObstacleHandler {
    pub fn new(config: ObstacleConfig) -> Self {
        Self { config }
    }

    /// Each step runs independently; failures are logged and swallowed.
    pub async fn clear_obstacles<S: BrowserSession>(
        &self,
        session: &mut S,
        url: &str,
    ) -> ObstacleReport {
        let mut report = ObstacleReport::default();

        // An unreadable page only skips the pop-up scan; the hold check still runs.
        match session.page_markup().await {
            Ok(markup) if contains_any(&markup, &self.config.popup_keywords) => {
                report.popup_suspected = true;
                engine_info!("Pop-up keywords detected for {}. Attempting to close.", url);
                report.popup_closed = self.close_popup(session).await;
            }
            Ok(_) => {}
            Err(err) => engine_error!("Failed to get page source for obstacle check: {}", err),
        }

        match self.press_and_hold(session).await {
            Ok(performed) => report.hold_performed = performed,
            Err(err) => engine_warn!("Failed during long press action: {}", err),
        }

        report
    }

    async fn close_popup<S: BrowserSession>(&self, session: &mut S) -> bool {
        for locator in &self.config.close_locators {
            let button = match session
                .find_clickable(locator, self.config.close_timeout)
                .await
            {
                Ok(button) => button,
                Err(_) => continue,
            };
            match session.click(&button).await {
                Ok(()) => {
                    engine_info!("Successfully closed pop-up using {}", locator);
                    return true;
                }
                Err(err) => engine_debug!("Close button {} not clickable: {}", locator, err),
            }
        }
        false
    }

    /// `Ok(false)` when no challenge is on the page, which is the usual case.
    async fn press_and_hold<S: BrowserSession>(&self, session: &mut S) -> Result<bool, BrowserError> {
        let button = match session
            .find_clickable(&self.config.hold_locator, self.config.hold_timeout)
            .await
        {
            Ok(button) => button,
            Err(err) if err.is_timeout() => {
                engine_debug!("Press-and-hold challenge not detected.");
                return Ok(false);
            }
            Err(err) => return Err(err),
        };

        engine_info!(
            "Press-and-hold button detected. Holding for {:?}.",
            self.config.hold_duration
        );
        session.click_and_hold(&button).await?;
        pause(self.config.hold_duration).await;
        session.release(&button).await?;
        engine_info!("Successfully executed press-and-hold action.");
        Ok(true)
    }
}
