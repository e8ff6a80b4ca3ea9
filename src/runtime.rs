//! Runtime shim synthesis for the generated document.
//!
//! The interpreter never executes any of this JavaScript; it emits it as
//! literal text into the output document, where it recreates the pieces
//! of the Acrobat/XFA scripting host that embedded form scripts expect:
//! dialogs, navigation, node resolution, event dispatch, audio cues, and
//! guarded (failure-isolated) script execution. Button wiring is done by
//! event delegation at the document root, so controls added after the
//! initial load still dispatch correctly, and a rejected or throwing
//! script never halts the other handlers.

/// Synthesized runtime, split around the aggregated form scripts.
///
/// The output document's script section has a fixed order: linkage
/// listener (optional) -> adapter/translator -> host runtime, then the
/// aggregated original scripts, then the click-delegation dispatcher.
/// `prelude` covers everything before the aggregated scripts and
/// `dispatcher` everything after.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeShim {
    /// Cascade listener (when linkage is required), compatibility
    /// adapter, Acrobat-call translator, and the `window.xfa` runtime.
    pub prelude: String,
    /// Click-delegation dispatcher, attached once at document-ready.
    pub dispatcher: &'static str,
}

/// Synthesize the runtime shim.
///
/// `linkage_required` controls whether the cascade value-propagation
/// listener is included; when false, no dead listener is emitted at all.
pub fn synthesize_shim(linkage_required: bool) -> RuntimeShim {
    let cascade = if linkage_required { CASCADE_JS } else { "" };
    let mut prelude = String::with_capacity(
        cascade.len() + ADAPTER_JS.len() + XFA_RUNTIME_JS.len() + 2,
    );
    prelude.push_str(cascade);
    prelude.push('\n');
    prelude.push_str(ADAPTER_JS);
    prelude.push('\n');
    prelude.push_str(XFA_RUNTIME_JS);

    RuntimeShim {
        prelude,
        dispatcher: DEFAULT_BINDINGS_JS,
    }
}

/// Cascade value propagation: on input, copy the value to every other
/// control sharing the same `data-cascade` group, excluding the source
/// control itself so a control never re-triggers its own copy.
pub(crate) const CASCADE_JS: &str = r#"
document.addEventListener('DOMContentLoaded', function(){
    var inputs = document.querySelectorAll("input[data-cascade], button[data-cascade]");
    inputs.forEach(function(input){
        input.addEventListener('input', function(){
            var group = input.getAttribute("data-cascade");
            var cascadeInputs = document.querySelectorAll("input[data-cascade='" + group + "'], button[data-cascade='" + group + "']");
            cascadeInputs.forEach(function(cInput){
                if(cInput !== input){
                    cInput.value = input.value;
                }
            });
        });
    });
});
"#;

/// Legacy string-escaping helper (defined only if absent) plus the
/// Acrobat-call translator. The translator is a literal rewrite, not a
/// parser: it maps known host-call idioms onto the `window.xfa` shim.
pub(crate) const ADAPTER_JS: &str = r#"
if (typeof schCar === 'undefined') {
    var schCar = {
        schEnt: function(str) {
            return str.replace(/&/g, '&amp;').replace(/</g, '&lt;').replace(/>/g, '&gt;');
        }
    };
}

// Translate Acrobat-specific JS idioms to their web shim equivalents.
function translateAcrobatJS(acrobatJS) {
    var webJS = acrobatJS.replace(/app\.alert/g, "window.xfa.host.messageBox");
    return webJS;
}
"#;

/// The `window.xfa` host object model: host operations (message box,
/// navigation, audio cue), form operations (node resolution by name,
/// bubbling event dispatch), a guarded default font-metrics stub, the
/// guarded synchronous executor, and the advanced namespace (async
/// execution with the same failure isolation, bulk handler registration).
pub(crate) const XFA_RUNTIME_JS: &str = r#"
if (typeof window.xfa === 'undefined') {
    window.xfa = {};
}
window.xfa.host = {
    messageBox: function(message, title, iconType) {
        alert(title ? `${title}: ${message}` : message);
    },
    gotoURL: function(url) {
        window.location.href = url;
    },
    beep: function(type) {
        const audio = new Audio('https://www.soundjay.com/button/beep-07.wav');
        audio.play();
    }
};
window.xfa.form = {
    resolveNode: function(path) {
        return document.querySelector(`[name='${path}']`);
    },
    execEvent: function(eventName, node) {
        if (node && node.dispatchEvent) {
            node.dispatchEvent(new Event(eventName, { bubbles: true }));
        }
    }
};

// Default font object so scripts referencing metrics do not fail.
if (typeof window.xfa.font === 'undefined') {
    window.xfa.font = {
        measureText: function(text) {
            return { width: text.length * 7 };
        }
    };
};

function executeXFAJavaScript(jsCode) {
    try {
        new Function(jsCode)();
    } catch (error) {
        console.error('Error executing XFA script:', error);
    }
}

window.xfa.advanced = {
    async executeAsync(jsCode) {
        try {
            const asyncFunc = new Function('return (async () => {' + jsCode + '})')();
            await asyncFunc;
        } catch (error) {
            console.error('Error executing async XFA script:', error);
        }
    },
    registerEventHandler: function(selector, eventName, handler) {
        const elements = document.querySelectorAll(selector);
        elements.forEach(function(el) {
            el.addEventListener(eventName, handler);
        });
    }
};
"#;

/// Click delegation at the document root: buttons with a
/// `data-acrobat-js` attribute lazily mark the runtime loaded, translate
/// the attached legacy script, and run it with failure isolation; other
/// buttons fall back to a default message box.
pub(crate) const DEFAULT_BINDINGS_JS: &str = r#"
document.addEventListener("DOMContentLoaded", function(){
    document.body.addEventListener("click", function(event){
        var target = event.target;
        if(target.tagName.toLowerCase() === "button"){
            if(target.hasAttribute("data-acrobat-js")){
                if(typeof window.xfaRuntimeLoaded === "undefined" || !window.xfaRuntimeLoaded){
                    console.log("Loading XFA runtime...");
                    window.xfaRuntimeLoaded = true;
                }
                var acrobatJS = target.getAttribute("data-acrobat-js");
                var translatedJS = translateAcrobatJS(acrobatJS);
                try {
                    new Function(translatedJS)();
                } catch(error) {
                    console.error("Error executing translated JS:", error);
                }
            } else {
                console.log("Button clicked (default binding): " + target.id);
                window.xfa.host.messageBox("Default action for " + target.id);
            }
        }
    });
});
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cascade_included_only_when_required() {
        let with = synthesize_shim(true);
        let without = synthesize_shim(false);
        assert!(with.prelude.contains("data-cascade"));
        assert!(!without.prelude.contains("data-cascade"));
        // The rest of the shim is identical either way.
        assert!(with.prelude.ends_with(XFA_RUNTIME_JS));
        assert!(without.prelude.ends_with(XFA_RUNTIME_JS));
    }

    #[test]
    fn test_prelude_carries_adapter_and_host_model() {
        let shim = synthesize_shim(false);
        assert!(shim.prelude.contains("function translateAcrobatJS"));
        assert!(shim.prelude.contains("window.xfa.host"));
        assert!(shim.prelude.contains("window.xfa.form"));
        assert!(shim.prelude.contains("window.xfa.font"));
        assert!(shim.prelude.contains("function executeXFAJavaScript"));
        assert!(shim.prelude.contains("window.xfa.advanced"));
    }

    #[test]
    fn test_dispatcher_is_delegated_and_lazy() {
        let shim = synthesize_shim(false);
        assert!(shim.dispatcher.contains("document.body.addEventListener(\"click\""));
        assert!(shim.dispatcher.contains("data-acrobat-js"));
        assert!(shim.dispatcher.contains("window.xfaRuntimeLoaded"));
        assert!(shim.dispatcher.contains("Default action for "));
    }

    #[test]
    fn test_guarded_definitions_are_idempotent() {
        let shim = synthesize_shim(false);
        assert!(shim.prelude.contains("typeof schCar === 'undefined'"));
        assert!(shim.prelude.contains("typeof window.xfa === 'undefined'"));
        assert!(shim.prelude.contains("typeof window.xfa.font === 'undefined'"));
    }
}
