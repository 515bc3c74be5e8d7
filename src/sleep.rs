use std::time::Duration;

// tokio::time::sleep is only available on non-WASM targets.
#[cfg(not(target_arch = "wasm32"))]
use tokio::time::sleep;

/// Suspends the current task for `delay`.
///
/// On native targets: `tokio::time::sleep`.
/// On WASM targets: a `Promise` resolved by the global `setTimeout`, which
/// exists both in browsers and in worker runtimes.
pub(crate) async fn wait(delay: Duration) {
    if delay.is_zero() {
        return;
    }

    #[cfg(not(target_arch = "wasm32"))]
    sleep(delay).await;

    #[cfg(target_arch = "wasm32")]
    set_timeout(delay).await;
}

#[cfg(target_arch = "wasm32")]
async fn set_timeout(delay: Duration) {
    use wasm_bindgen::{JsCast, JsValue};

    let millis = delay.as_millis().min(i32::MAX as u128) as f64;
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let global = js_sys::global();
        let scheduled = js_sys::Reflect::get(&global, &JsValue::from_str("setTimeout"))
            .ok()
            .and_then(|value| value.dyn_into::<js_sys::Function>().ok())
            .map(|set_timeout| set_timeout.call2(&global, &resolve, &JsValue::from_f64(millis)))
            .is_some_and(|called| called.is_ok());

        // No timer in this runtime: resolve now rather than hang forever.
        if !scheduled {
            let _ = resolve.call0(&JsValue::UNDEFINED);
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use std::time::Duration;

    use super::wait;

    #[tokio::test(start_paused = true)]
    async fn wait_suspends_for_the_full_delay() {
        let started = tokio::time::Instant::now();
        wait(Duration::from_millis(1_500)).await;
        assert!(started.elapsed() >= Duration::from_millis(1_500));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_delay_returns_immediately() {
        let started = tokio::time::Instant::now();
        wait(Duration::ZERO).await;
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
