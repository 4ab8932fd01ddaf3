/// Reusable UI components

use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct CountFieldProps {
    /// DOM id of the value element
    pub id: AttrValue,
    pub label: AttrValue,
    pub value: usize,
}

/// One labelled count in the popup
#[function_component(CountField)]
pub fn count_field(props: &CountFieldProps) -> Html {
    html! {
        <div class="count-item">
            <span class="count-label">{props.label.clone()}</span>
            <span class="count-value" id={props.id.clone()}>{props.value}</span>
        </div>
    }
}
