//! Alert system for displaying success and error messages to users.
//!
//! This module provides a unified way to display alert messages across the application
//! with proper styling and dismissal functionality. Alerts are swapped into the
//! `#alert-container` element in the base layout via an htmx out-of-band swap.

use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlertType {
    Success,
    Error,
}

/// Renders alert messages with appropriate styling
pub struct AlertTemplate<'a> {
    pub alert_type: AlertType,
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> AlertTemplate<'a> {
    /// Create a new success alert
    #[allow(dead_code)]
    pub fn success(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message,
            details,
        }
    }

    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message,
            details,
        }
    }

    pub fn into_markup(self) -> Markup {
        let (container_style, icon) = match self.alert_type {
            AlertType::Success => (
                "flex items-start gap-3 p-4 mb-4 text-sm rounded border \
                text-green-800 border-green-300 bg-green-50 \
                dark:bg-gray-800 dark:text-green-400 dark:border-green-800",
                "✓",
            ),
            AlertType::Error => (
                "flex items-start gap-3 p-4 mb-4 text-sm rounded border \
                text-red-800 border-red-300 bg-red-50 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800",
                "✕",
            ),
        };

        html! {
            div id="alert-container" hx-swap-oob="true" class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(container_style) role="alert"
                {
                    span aria-hidden="true" { (icon) }

                    div
                    {
                        p class="font-medium" { (self.message) }

                        @if !self.details.is_empty() {
                            p { (self.details) }
                        }
                    }

                    button
                        type="button"
                        class="ms-auto -mx-1.5 -my-1.5 rounded p-1.5 inline-flex items-center justify-center h-8 w-8 hover:bg-gray-200 dark:hover:bg-gray-700"
                        aria-label="Close"
                        onclick="this.closest('[role=alert]').remove()"
                    {
                        "✕"
                    }
                }
            }
        }
    }
}
