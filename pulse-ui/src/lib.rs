//! The LifePulse form for WebAssembly hosts.

#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use std::rc::Rc;

    use crate::styles;
    use pulse_core::{
        Assessment, FieldGroup, FieldKind, FieldSpec, PatientObservation, Predictor, Profile,
        PulseConfig, PulseError, FIELD_SPECS,
    };
    use wasm_bindgen::prelude::*;
    use web_sys::{console, Document, Element, HtmlInputElement, HtmlSelectElement, Window};
    use yew::prelude::*;
    use yew::TargetCast;

    #[derive(Clone, PartialEq)]
    enum ScanState {
        Idle,
        Done(Assessment),
        Rejected(Vec<String>),
    }

    #[derive(Properties, PartialEq)]
    pub struct PulseFormProps {
        pub assets: Rc<Result<Predictor, String>>,
    }

    #[function_component(PulseForm)]
    fn pulse_form(props: &PulseFormProps) -> Html {
        use_effect_with((), |_| {
            if let Some(window) = web_sys::window() {
                if let Some(document) = window.document() {
                    if let Err(err) = styles::ensure_styles(&document) {
                        console::error_1(&err);
                    }
                }
            }
            || ()
        });

        let observation = use_state(PatientObservation::default);
        let scan = use_state(|| ScanState::Idle);

        let predictor = match props.assets.as_ref() {
            Ok(predictor) => predictor.clone(),
            Err(reason) => return render_missing_assets(reason),
        };
        let model_info = render_model_info(&predictor);

        let on_field = {
            let observation = observation.clone();
            Callback::from(move |(key, value): (&'static str, f64)| {
                let mut next = *observation;
                match next.set(key, value) {
                    Ok(()) => observation.set(next),
                    Err(err) => console::warn_1(&JsValue::from_str(&err.to_string())),
                }
            })
        };

        let on_profile = {
            let observation = observation.clone();
            let scan = scan.clone();
            Callback::from(move |profile: Profile| {
                observation.set(PatientObservation::profile(profile));
                scan.set(ScanState::Idle);
            })
        };

        let on_submit = {
            let observation = observation.clone();
            let scan = scan.clone();
            Callback::from(move |event: SubmitEvent| {
                event.prevent_default();
                let next = match predictor.assess(&observation) {
                    Ok(assessment) => ScanState::Done(assessment),
                    Err(PulseError::Validation(violations)) => ScanState::Rejected(
                        violations.iter().map(ToString::to_string).collect(),
                    ),
                    Err(err) => ScanState::Rejected(vec![err.to_string()]),
                };
                scan.set(next);
            })
        };

        html! {
            <div class="pulse-root">
                <aside class="pulse-sidebar">
                    <h2>{"Control Panel"}</h2>
                    <h4>{"Quick Load Profiles"}</h4>
                    <div class="pulse-profiles">
                        { render_profile_button(Profile::Healthy, on_profile.clone()) }
                        { render_profile_button(Profile::HighRisk, on_profile) }
                    </div>
                    { model_info }
                    <div class="pulse-note" data-level="warning">
                        <strong>{"Disclaimer: "}</strong>
                        {"For educational use only. Not a medical device."}
                    </div>
                </aside>
                <main>
                    <header class="pulse-title">
                        <h1><span class="pulse-heart">{"💓"}</span>{"LifePulse"}</h1>
                        <p class="pulse-tagline">{"AI that listens to your heart."}</p>
                        <p>{"Enter patient vitals below to generate a real-time risk assessment."}</p>
                    </header>
                    <form onsubmit={on_submit}>
                        {
                            for FieldGroup::ALL.into_iter().map(|group| {
                                render_group(group, &observation, on_field.clone())
                            })
                        }
                        <button type="submit" class="pulse-button">{"RUN DIAGNOSTIC SCAN"}</button>
                    </form>
                    { render_scan(&scan) }
                </main>
            </div>
        }
    }

    fn render_model_info(predictor: &Predictor) -> Html {
        let model = predictor.model();
        let accuracy = model
            .reported_accuracy
            .map(|acc| format!("{:.2}%", acc * 100.0))
            .unwrap_or_else(|| "not reported".to_string());

        html! {
            <div class="pulse-note" data-level="info">
                <p><strong>{"Model Accuracy: "}</strong>{ accuracy }</p>
                <p><strong>{"Architecture: "}</strong>{ model.architecture() }</p>
            </div>
        }
    }

    fn render_missing_assets(reason: &str) -> Html {
        html! {
            <div class="pulse-root">
                <div class="pulse-note" data-level="error" role="alert">
                    <h2>{"Critical Error: Models not found!"}</h2>
                    <p>{"Please check your /models folder."}</p>
                    <p>{ reason.to_string() }</p>
                </div>
            </div>
        }
    }

    fn render_profile_button(profile: Profile, on_profile: Callback<Profile>) -> Html {
        let onclick = Callback::from(move |_| on_profile.emit(profile));
        html! {
            <button type="button" class="pulse-button" onclick={onclick}>{ profile.label() }</button>
        }
    }

    fn render_group(
        group: FieldGroup,
        observation: &PatientObservation,
        on_field: Callback<(&'static str, f64)>,
    ) -> Html {
        html! {
            <section class="pulse-section">
                <h3>{ group.title() }</h3>
                {
                    if group == FieldGroup::StressTest {
                        html! {
                            <p class="pulse-note" data-level="info">
                                {"These values usually come from an EKG or Stress Test. If you don't know them, leave them at the default 'Normal' settings."}
                            </p>
                        }
                    } else {
                        Html::default()
                    }
                }
                <div class="pulse-fields">
                    {
                        for FIELD_SPECS
                            .iter()
                            .filter(|spec| spec.group == group)
                            .map(|spec| render_field(spec, observation, on_field.clone()))
                    }
                </div>
            </section>
        }
    }

    fn render_field(
        spec: &'static FieldSpec,
        observation: &PatientObservation,
        on_field: Callback<(&'static str, f64)>,
    ) -> Html {
        let value = observation.get(spec.key).unwrap_or_default();
        let key = spec.key;

        let control = match spec.kind {
            FieldKind::Number { min, max, step } => {
                let onchange = Callback::from(move |event: Event| {
                    let input: HtmlInputElement = event.target_unchecked_into();
                    if let Ok(value) = input.value().trim().parse::<f64>() {
                        on_field.emit((key, value));
                    }
                });
                html! {
                    <input
                        id={key}
                        type="number"
                        min={min.to_string()}
                        max={max.to_string()}
                        step={step.to_string()}
                        value={value.to_string()}
                        onchange={onchange}
                    />
                }
            }
            FieldKind::Choice { options } => {
                let onchange = Callback::from(move |event: Event| {
                    let select: HtmlSelectElement = event.target_unchecked_into();
                    if let Ok(code) = select.value().parse::<f64>() {
                        on_field.emit((key, code));
                    }
                });
                html! {
                    <select id={key} onchange={onchange}>
                        {
                            for options.iter().enumerate().map(|(code, label)| html! {
                                <option value={code.to_string()} selected={code as f64 == value}>
                                    { *label }
                                </option>
                            })
                        }
                    </select>
                }
            }
            FieldKind::Flag => html! {
                <div class="pulse-flag" role="radiogroup">
                    {
                        for [0.0, 1.0].into_iter().map(|flag| {
                            let on_field = on_field.clone();
                            let onchange = Callback::from(move |_: Event| on_field.emit((key, flag)));
                            html! {
                                <label>
                                    <input
                                        type="radio"
                                        name={key}
                                        checked={value == flag}
                                        onchange={onchange}
                                    />
                                    { spec.option_label(flag as usize).unwrap_or_default() }
                                </label>
                            }
                        })
                    }
                </div>
            },
        };

        html! {
            <div class="pulse-field">
                <label for={key}>{ spec.label }</label>
                { control }
                { spec.help.map(|help| html! { <p class="pulse-help">{ help }</p> }).unwrap_or_default() }
            </div>
        }
    }

    fn render_scan(scan: &ScanState) -> Html {
        match scan {
            ScanState::Idle => Html::default(),
            ScanState::Rejected(problems) => html! {
                <div class="pulse-note" data-level="error" role="alert">
                    <strong>{"Please correct the highlighted values:"}</strong>
                    <ul>{ for problems.iter().map(|p| html! { <li>{ p.clone() }</li> }) }</ul>
                </div>
            },
            ScanState::Done(assessment) => render_assessment(assessment),
        }
    }

    fn render_assessment(assessment: &Assessment) -> Html {
        let verdict = if assessment.is_risk() { "high_risk" } else { "healthy" };
        let icon = if assessment.is_risk() { "⚠️" } else { "✅" };

        html! {
            <section class="pulse-result" aria-live="polite">
                <div class="pulse-verdict" data-verdict={verdict}>
                    <h2>{ format!("{icon} {}", assessment.headline) }</h2>
                    <p><strong>{ format!("Confidence Score: {}", assessment.confidence_label()) }</strong></p>
                    <p>{ assessment.summary.clone() }</p>
                    <ul>
                        <li><strong>{"Recommendation: "}</strong>{ assessment.recommendation.clone() }</li>
                        <li><strong>{"Next Step: "}</strong>{ assessment.next_step.clone() }</li>
                    </ul>
                    <p class="pulse-help">
                        { format!("Scanned at {}", assessment.assessed_at.format("%Y-%m-%d %H:%M")) }
                    </p>
                </div>
                <div class="pulse-gauge">
                    <h3>{"Risk Gauge"}</h3>
                    <progress max="1" value={assessment.gauge.to_string()} />
                </div>
            </section>
        }
    }

    /// Mounts the form under `selector`, using the given asset exports.
    ///
    /// Assets that fail to parse still mount, rendering a blocking error
    /// in place of the form.
    #[wasm_bindgen]
    pub fn mount_pulse_form(
        selector: &str,
        model_json: &str,
        scaler_json: &str,
    ) -> Result<(), JsValue> {
        let window: Window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Cannot access document"))?;

        let target: Element = document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Invalid selector: {err:?}")))?
            .ok_or_else(|| JsValue::from_str("No element matches the selector"))?;

        let assets =
            pulse_assets::predictor_from_strs(model_json, scaler_json, &PulseConfig::default())
                .map_err(|err| err.to_string());
        if let Err(reason) = &assets {
            console::error_1(&JsValue::from_str(reason));
        }

        yew::Renderer::<PulseForm>::with_root_and_props(
            target,
            PulseFormProps {
                assets: Rc::new(assets),
            },
        )
        .render();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::mount_pulse_form;

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_pulse_form(_: &str, _: &str, _: &str) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "pulse-ui only supports the wasm32 target",
    ))
}
