//! Browser plumbing: the WebDriver session plus the processes behind it

pub mod session;
pub mod xvfb;

pub use session::BrowserSession;
pub use xvfb::XvfbGuard;

use thirtyfour::prelude::*;

use crate::common::Result;

/// Clear a form field and type a value into it
pub(crate) async fn fill_field(driver: &WebDriver, by: By, value: &str) -> Result<()> {
    let field = driver.find(by).await?;
    field.clear().await?;
    field.send_keys(value).await?;
    Ok(())
}

/// Click through the DOM API, bypassing overlays that swallow native clicks
pub(crate) async fn js_click(driver: &WebDriver, element: &WebElement) -> Result<()> {
    driver
        .execute("arguments[0].click();", vec![element.to_json()?])
        .await?;
    Ok(())
}
