//! Operator dashboard page.
//!
//! The dashboard frontend is built and served elsewhere; this route only
//! verifies operator access behind the dashboard gate.

use axum::response::Html;

pub async fn home() -> Html<&'static str> {
    Html(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head><meta charset=\"UTF-8\"><title>Meter Dashboard</title></head>\n\
         <body>\n\
         <h1>Meter</h1>\n\
         <p>Operator access verified.</p>\n\
         </body>\n\
         </html>",
    )
}
