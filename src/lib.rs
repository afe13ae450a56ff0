/*!
# Excel to Image Mailer

A small web application that turns an uploaded Excel sheet into a table
image and emails it to a recipient, built in Rust.

## Overview

Each request runs one synchronous pipeline: upload → parse → render →
send → confirm. Nothing is persisted and nothing is shared between
requests apart from the immutable SMTP transport.

Two rendering pipelines are available, selected by the form's image type:

- **Full table**: every row and column of the sheet drawn verbatim into a
  grid image.
- **Pin summary**: rows grouped by the `Cust Pin` column; pins appearing at
  least twice are drawn as `(state, pin, count)` rows, in the order each
  pin was first seen.

Both pipelines end in the same grid drawing step: a white canvas with a
yellow header band and black cell text, 120×40 pixel cells, encoded as
JPEG.

## Architecture

- **Web layer**: axum router with a multipart upload form, a success page
  and a direct render API (`POST /api/render`) that returns the JPEG
  without mailing it.
- **Core**: spreadsheet ingestion (calamine), grid building, pin
  aggregation (indexmap preserves first-sighting order) and grid drawing
  (plotters bitmap backend, image JPEG encoder).
- **Mail**: lettre SMTP transport with TLS, configured explicitly from
  environment variables at startup.

## Modules

- **cell**: loosely typed cell values and their canonical display text
- **loader**: decoding uploaded bytes into headers plus data rows
- **convert**: mode dispatch, the full-table grid and the pipeline entry
  point
- **aggregate**: pin counting and the summary grid
- **render**: grid geometry and JPEG rasterization
- **mailer**: SMTP delivery of the rendered image
- **error**: conversion and mail error types
- **app**: routing and form handling

## Error handling

Missing required columns is the one failure with a specific user-facing
message (it lists every missing column name). Every other failure is shown
as an unexpected error while the full detail is logged for the operator.
*/

// Re-export all modules so they appear in the documentation
pub mod aggregate;
pub mod app;
pub mod cell;
pub mod convert;
pub mod error;
pub mod loader;
pub mod mailer;
pub mod render;

/// Re-export everything from these modules to make it easier to use
pub use aggregate::*;
pub use cell::*;
pub use convert::*;
pub use error::*;
pub use loader::*;
pub use mailer::*;
pub use render::*;
