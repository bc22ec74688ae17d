//! The action registry and the generated call conventions.
//!
//! The single `send_actions!` invocation below is the registry: one row
//! per action yields the [`Action`] variant, its wire name, and the
//! three scheduling methods on [`MessengerContext`]. Adding a row makes
//! all three entry points available with no further code.

use std::time::Duration;

use serde_json::Value;

use courier_bot_core::EnqueueError;

use crate::context::{CallKind, MessengerContext};

macro_rules! send_actions {
    ($(
        $variant:ident = $name:literal =>
            $method:ident / $method_to:ident / $method_with_delay:ident
            ( $( $arg:ident : $ty:ty ),* );
    )*) => {
        /// Outbound actions the dispatcher can schedule.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Action {
            $( $variant, )*
        }

        impl Action {
            /// Wire name of the remote-client method for this action.
            pub fn name(self) -> &'static str {
                match self {
                    $( Action::$variant => $name, )*
                }
            }

            /// Every registered action.
            pub const ALL: &'static [Action] = &[ $( Action::$variant, )* ];
        }

        impl MessengerContext {
            $(
                #[doc = concat!("Schedules `", $name, "` for the session recipient, paced by the default delay, with a typing indicator.")]
                pub fn $method(&self, $( $arg: $ty ),*) -> Result<(), EnqueueError> {
                    self.schedule(
                        Action::$variant,
                        CallKind::Paced,
                        vec![ $( Value::from($arg) ),* ],
                    )
                }

                #[doc = concat!("Schedules `", $name, "` for an explicit recipient, unpaced and without indicators. For out-of-band sends.")]
                pub fn $method_to(
                    &self,
                    recipient: impl Into<String>,
                    $( $arg: $ty ),*
                ) -> Result<(), EnqueueError> {
                    self.schedule(
                        Action::$variant,
                        CallKind::Background(recipient.into()),
                        vec![ $( Value::from($arg) ),* ],
                    )
                }

                #[doc = concat!("Schedules `", $name, "` for the session recipient with an explicit pacing delay.")]
                pub fn $method_with_delay(
                    &self,
                    delay: Duration,
                    $( $arg: $ty ),*
                ) -> Result<(), EnqueueError> {
                    self.schedule(
                        Action::$variant,
                        CallKind::Delayed(delay),
                        vec![ $( Value::from($arg) ),* ],
                    )
                }
            )*
        }
    };
}

send_actions! {
    SendText = "sendText" =>
        send_text / send_text_to / send_text_with_delay (text: &str);
    SendImage = "sendImage" =>
        send_image / send_image_to / send_image_with_delay (url: &str);
    SendAudio = "sendAudio" =>
        send_audio / send_audio_to / send_audio_with_delay (url: &str);
    SendVideo = "sendVideo" =>
        send_video / send_video_to / send_video_with_delay (url: &str);
    SendFile = "sendFile" =>
        send_file / send_file_to / send_file_with_delay (url: &str);
    SendQuickReplies = "sendQuickReplies" =>
        send_quick_replies / send_quick_replies_to / send_quick_replies_with_delay
        (text: &str, quick_replies: Value);
    SendGenericTemplate = "sendGenericTemplate" =>
        send_generic_template / send_generic_template_to / send_generic_template_with_delay
        (elements: Value);
    SendButtonTemplate = "sendButtonTemplate" =>
        send_button_template / send_button_template_to / send_button_template_with_delay
        (text: &str, buttons: Value);
    SendListTemplate = "sendListTemplate" =>
        send_list_template / send_list_template_to / send_list_template_with_delay
        (elements: Value, buttons: Value);
    SendReceiptTemplate = "sendReceiptTemplate" =>
        send_receipt_template / send_receipt_template_to / send_receipt_template_with_delay
        (receipt: Value);
    SendAirlineBoardingPassTemplate = "sendAirlineBoardingPassTemplate" =>
        send_airline_boarding_pass_template / send_airline_boarding_pass_template_to / send_airline_boarding_pass_template_with_delay
        (payload: Value);
    SendAirlineCheckinTemplate = "sendAirlineCheckinTemplate" =>
        send_airline_checkin_template / send_airline_checkin_template_to / send_airline_checkin_template_with_delay
        (payload: Value);
    SendAirlineItineraryTemplate = "sendAirlineItineraryTemplate" =>
        send_airline_itinerary_template / send_airline_itinerary_template_to / send_airline_itinerary_template_with_delay
        (payload: Value);
    SendAirlineFlightUpdateTemplate = "sendAirlineFlightUpdateTemplate" =>
        send_airline_flight_update_template / send_airline_flight_update_template_to / send_airline_flight_update_template_with_delay
        (payload: Value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_registry() {
        assert_eq!(Action::SendText.name(), "sendText");
        assert_eq!(Action::SendGenericTemplate.name(), "sendGenericTemplate");
        assert_eq!(
            Action::SendAirlineFlightUpdateTemplate.name(),
            "sendAirlineFlightUpdateTemplate"
        );
    }

    #[test]
    fn registry_lists_every_action_once() {
        assert_eq!(Action::ALL.len(), 14);
        let mut names: Vec<&str> = Action::ALL.iter().map(|a| a.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Action::ALL.len());
    }
}
