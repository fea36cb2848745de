// src/dashboard/print.rs
//
// Standalone printable list of the filtered appointments. The browser opens it
// in a new window; the page prints itself on load and closes afterwards.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::{dates::hhmm, models::Appointment};

const CSS: &str = r#"
body { font-family: Arial, sans-serif; padding: 20px; }
.print-table { width: 100%; border-collapse: collapse; font-size: 12px; }
.print-table th, .print-table td { border: 1px solid #ddd; padding: 6px; text-align: left; vertical-align: top; }
.print-table th { background: #f3f4f6; }
@media print {
  body { padding: 0; }
  h2 { font-size: 16px; }
}
"#;

const PRINT_ON_LOAD: &str = r#"
window.onload = function() {
  window.print();
  window.onafterprint = function(){ window.close(); };
};
"#;

const COLUMNS: [&str; 8] = ["Date", "Time", "Service", "Name", "DOB", "NHS", "Email", "Phone"];

/// `rows` are expected oldest first (see `CalendarState::print_rows`).
pub fn print_document(rows: &[&Appointment], printed_at: &str) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                title { "Print Appointments" }
                style { (PreEscaped(CSS)) }
            }
            body {
                div.print-wrap {
                    h2 { "Appointments List (" (rows.len()) ")" }
                    div.printed { "Printed: " (printed_at) }
                    table.print-table {
                        thead {
                            tr {
                                @for col in COLUMNS {
                                    th { (col) }
                                }
                            }
                        }
                        tbody {
                            @if rows.is_empty() {
                                tr { td colspan=(COLUMNS.len()) { "No appointments" } }
                            }
                            @for a in rows {
                                tr {
                                    td { (a.date) }
                                    td { (hhmm(&a.time)) }
                                    td { (a.service) }
                                    td { (a.display_name()) }
                                    td { (a.dob) }
                                    td { (a.nhs) }
                                    td { (a.email) }
                                    td { (a.phone) }
                                }
                            }
                        }
                    }
                }
                script { (PreEscaped(PRINT_ON_LOAD)) }
            }
        }
    }
}
