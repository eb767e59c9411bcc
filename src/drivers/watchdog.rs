//! Task Watchdog Timer (TWDT) driver.
//!
//! Resets the device if the tick loop stalls.  The loop feeds it every
//! tick while the session is pending or running.  Before the terminal
//! halt the task is released from the TWDT: a reset there would reboot
//! into a second session, which the rig must never do.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Subscribe the current task with a `timeout_ms` deadline.
    #[cfg(target_os = "espidf")]
    pub fn new(timeout_ms: u32) -> Self {
        // SAFETY: called once from the main task before the tick loop.
        unsafe {
            let cfg = esp_task_wdt_config_t {
                timeout_ms,
                idle_core_mask: 0,
                trigger_panic: true,
            };
            let ret = esp_task_wdt_reconfigure(&cfg);
            if ret != ESP_OK {
                log::warn!("TWDT reconfigure returned {} (may already be configured)", ret);
            }

            let subscribed = esp_task_wdt_add(core::ptr::null_mut()) == ESP_OK;
            if subscribed {
                info!("Watchdog: subscribed ({}ms timeout)", timeout_ms);
            } else {
                log::warn!("Watchdog: failed to subscribe");
            }
            Self { subscribed }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(timeout_ms: u32) -> Self {
        info!("Watchdog(sim): no-op ({}ms)", timeout_ms);
        Self {}
    }

    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                // SAFETY: the current task is subscribed.
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
    }

    /// Unsubscribe ahead of the terminal halt.
    pub fn release(self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                // SAFETY: the current task is subscribed; removing it is
                // the last TWDT call it makes.
                unsafe {
                    esp_task_wdt_delete(core::ptr::null_mut());
                }
            }
        }
        info!("Watchdog: released for halt");
    }
}
