//! The wallet the page talks to.
//!
//! In the browser this is whatever extension injected `window.solana`. Other
//! targets have no injected wallet and report it as missing.

#[cfg(target_arch = "wasm32")]
pub use injected::InjectedWallet as BrowserWallet;

#[cfg(not(target_arch = "wasm32"))]
pub use unavailable::UnavailableWallet as BrowserWallet;

#[cfg(target_arch = "wasm32")]
mod injected {
    use api::Pubkey;
    use api::Signature;
    use api::WalletError;
    use api::WalletProvider;
    use async_trait::async_trait;
    use dioxus_logger::tracing::info;
    use js_sys::Array;
    use js_sys::Function;
    use js_sys::Object;
    use js_sys::Promise;
    use js_sys::Reflect;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::JsValue;
    use wasm_bindgen_futures::JsFuture;

    #[derive(Default)]
    pub struct InjectedWallet;

    impl InjectedWallet {
        fn provider() -> Option<Object> {
            let window = web_sys::window()?;
            let solana = Reflect::get(&window, &JsValue::from_str("solana")).ok()?;
            solana.dyn_into::<Object>().ok()
        }

        /// Calls `provider[method](...args)` and awaits the returned promise.
        async fn call(method: &str, args: &[JsValue]) -> Result<JsValue, WalletError> {
            let provider = Self::provider().ok_or(WalletError::NotFound)?;
            let function: Function = Reflect::get(&provider, &JsValue::from_str(method))
                .ok()
                .and_then(|f| f.dyn_into().ok())
                .ok_or_else(|| WalletError::Protocol(format!("wallet has no {method}()")))?;

            let arguments: Array = args.iter().collect();
            let returned = function
                .apply(&provider, &arguments)
                .map_err(|e| WalletError::Rejected(describe(&e)))?;
            let promise: Promise = returned
                .dyn_into()
                .map_err(|_| WalletError::Protocol(format!("{method}() did not return a promise")))?;
            JsFuture::from(promise)
                .await
                .map_err(|e| WalletError::Rejected(describe(&e)))
        }
    }

    fn field(value: &JsValue, name: &str) -> Result<JsValue, WalletError> {
        Reflect::get(value, &JsValue::from_str(name))
            .ok()
            .filter(|v| !v.is_undefined() && !v.is_null())
            .ok_or_else(|| WalletError::Protocol(format!("wallet response has no {name}")))
    }

    fn describe(error: &JsValue) -> String {
        error
            .as_string()
            .or_else(|| {
                Reflect::get(error, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{error:?}"))
    }

    #[async_trait(?Send)]
    impl WalletProvider for InjectedWallet {
        fn is_available(&self) -> bool {
            let Some(provider) = Self::provider() else {
                return false;
            };
            if Reflect::get(&provider, &JsValue::from_str("isPhantom"))
                .is_ok_and(|v| v.is_truthy())
            {
                info!("Phantom wallet found!");
            }
            true
        }

        async fn connect(&self) -> Result<Pubkey, WalletError> {
            let response = Self::call("connect", &[]).await?;
            let public_key = field(&response, "publicKey")?;
            let text: String = public_key
                .dyn_ref::<Object>()
                .map(|key| key.to_string().into())
                .or_else(|| public_key.as_string())
                .ok_or_else(|| WalletError::Protocol("unreadable publicKey".to_string()))?;
            text.parse()
                .map_err(|e| WalletError::Protocol(format!("publicKey {text}: {e}")))
        }

        async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError> {
            let params = Object::new();
            let request = Object::new();
            let encoded = JsValue::from_str(&bs58::encode(message).into_string());
            let built = Reflect::set(&params, &JsValue::from_str("message"), &encoded)
                .and_then(|_| {
                    Reflect::set(
                        &request,
                        &JsValue::from_str("method"),
                        &JsValue::from_str("signTransaction"),
                    )
                })
                .and_then(|_| Reflect::set(&request, &JsValue::from_str("params"), &params));
            if let Err(e) = built {
                return Err(WalletError::Protocol(describe(&e)));
            }

            let response = Self::call("request", &[request.into()]).await?;
            let signature = field(&response, "signature")?
                .as_string()
                .ok_or_else(|| WalletError::Protocol("signature is not a string".to_string()))?;
            signature
                .parse()
                .map_err(|e| WalletError::Protocol(format!("signature {signature}: {e}")))
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod unavailable {
    use api::Pubkey;
    use api::Signature;
    use api::WalletError;
    use api::WalletProvider;
    use async_trait::async_trait;

    #[derive(Default)]
    pub struct UnavailableWallet;

    #[async_trait(?Send)]
    impl WalletProvider for UnavailableWallet {
        fn is_available(&self) -> bool {
            false
        }

        async fn connect(&self) -> Result<Pubkey, WalletError> {
            Err(WalletError::NotFound)
        }

        async fn sign_message(&self, _message: &[u8]) -> Result<Signature, WalletError> {
            Err(WalletError::NotFound)
        }
    }

}
