//! Browser runtime generator.
//!
//! Every position is baked into the markup. The runtime toggles tier
//! visibility, tracks hover through one delegated listener per overlay,
//! re-resolves palette colors on theme change and replaces a broken image
//! with an inline error.

use inset_overlay::color::PALETTE;
use serde_json::{Map, Value};

/// Palette as `{ name: { light, dark } }` JSON.
pub fn palette_json() -> String {
    let mut map = Map::new();
    for (name, color) in PALETTE {
        let mut pair = Map::new();
        pair.insert("light".to_string(), Value::from(color.light));
        pair.insert("dark".to_string(), Value::from(color.dark));
        map.insert(name.to_string(), Value::Object(pair));
    }
    Value::Object(map).to_string()
}

/// Generate the overlay runtime script.
pub fn generate_runtime() -> String {
    let palette = palette_json();

    format!(
        r#"/**
 * Overlay runtime - generated
 */
(() => {{
  const PALETTE = {palette};
  const THEME_KEY = 'theme';
  const THEME_CYCLE = {{ auto: 'light', light: 'dark', dark: 'auto' }};

  const systemDark = window.matchMedia
    ? window.matchMedia('(prefers-color-scheme: dark)')
    : null;

  function storedPreference() {{
    try {{
      const value = localStorage.getItem(THEME_KEY);
      return value in THEME_CYCLE ? value : 'auto';
    }} catch (e) {{
      return 'auto';
    }}
  }}

  function effectiveTheme(preference) {{
    if (preference === 'auto') {{
      return systemDark && systemDark.matches ? 'dark' : 'light';
    }}
    return preference;
  }}

  function hexToRgba(hex) {{
    const m = /^#?([a-f\d]{{2}})([a-f\d]{{2}})([a-f\d]{{2}})$/i.exec(hex);
    if (!m) return null;
    return `rgba(${{parseInt(m[1], 16)}}, ${{parseInt(m[2], 16)}}, ${{parseInt(m[3], 16)}}, 0.1)`;
  }}

  function resolveColor(spec, theme) {{
    if (!spec || spec.startsWith('#')) return spec;
    const entry = PALETTE[spec];
    return entry ? entry[theme] : spec;
  }}

  let lastTheme = null;

  function applyTheme() {{
    const preference = storedPreference();
    const theme = effectiveTheme(preference);
    document.documentElement.dataset.theme = theme;
    document.documentElement.dataset.themePreference = preference;
    if (theme === lastTheme) return;
    lastTheme = theme;

    document.querySelectorAll('.hotspot[data-color]').forEach((hotspot) => {{
      const color = resolveColor(hotspot.dataset.color, theme);
      const highlight = hotspot.querySelector('.highlight');
      if (highlight && highlight.style.borderColor) {{
        highlight.style.borderColor = color;
        const fill = hexToRgba(color);
        if (fill) highlight.style.background = fill;
      }}
      hotspot.querySelectorAll('.line-segment').forEach((segment) => {{
        segment.style.backgroundColor = color;
      }});
    }});
  }}

  function cycleTheme() {{
    const next = THEME_CYCLE[storedPreference()];
    try {{
      localStorage.setItem(THEME_KEY, next);
    }} catch (e) {{}}
    applyTheme();
  }}

  function setShowAll(root, showAll) {{
    root.dataset.showAll = String(showAll);
    root.querySelectorAll('.hover-line, .hover-tooltip').forEach((el) => {{
      el.style.display = showAll ? 'none' : '';
    }});
    root.querySelectorAll('.show-all-line, .show-all-tooltip').forEach((el) => {{
      el.style.display = showAll ? '' : 'none';
    }});
    root.querySelectorAll('.is-hovered').forEach((el) => el.classList.remove('is-hovered'));
  }}

  function setHovered(root, id, hovered) {{
    if (root.dataset.showAll === 'true') return;
    root.querySelectorAll(`[data-hotspot-id="${{CSS.escape(id)}}"]`).forEach((el) => {{
      el.classList.toggle('is-hovered', hovered);
    }});
  }}

  function attach(root) {{
    root.addEventListener('mouseover', (event) => {{
      const target = event.target.closest('.hotspot[data-hotspot-id]');
      if (target && !target.contains(event.relatedTarget)) {{
        setHovered(root, target.dataset.hotspotId, true);
      }}
    }});
    root.addEventListener('mouseout', (event) => {{
      const target = event.target.closest('.hotspot[data-hotspot-id]');
      if (target && !target.contains(event.relatedTarget)) {{
        setHovered(root, target.dataset.hotspotId, false);
      }}
    }});

    const image = root.querySelector('img.base-image');
    if (image) {{
      image.addEventListener('error', () => {{
        const src = image.getAttribute('src');
        const error = document.createElement('div');
        error.className = 'overlay-error';
        error.setAttribute('role', 'alert');
        const title = document.createElement('p');
        title.innerHTML = '<strong>Failed to load image.</strong>';
        const path = document.createElement('p');
        path.textContent = `Failed to load image: ${{src}}`;
        error.append(title, path);
        root.replaceWith(error);
      }});
    }}
  }}

  document.addEventListener('DOMContentLoaded', () => {{
    const roots = Array.from(document.querySelectorAll('[data-overlay-root]'));
    roots.forEach(attach);

    const toggle = document.getElementById('overlay-toggle');
    if (toggle) {{
      toggle.addEventListener('click', () => {{
        const showAll = !(roots[0] && roots[0].dataset.showAll === 'true');
        roots.forEach((root) => setShowAll(root, showAll));
        toggle.setAttribute('aria-pressed', String(showAll));
        toggle.textContent = showAll ? 'Hide all' : 'Show all';
      }});
    }}

    const themeToggle = document.getElementById('theme-toggle');
    if (themeToggle) themeToggle.addEventListener('click', cycleTheme);
    if (systemDark && systemDark.addEventListener) {{
      systemDark.addEventListener('change', applyTheme);
    }}

    applyTheme();
  }});
}})();
"#,
        palette = palette,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_json_has_every_color() {
        let value: Value = serde_json::from_str(&palette_json()).unwrap();
        assert_eq!(value["green"]["light"], "#22c55e");
        assert_eq!(value["pink"]["dark"], "#f472b6");
        assert_eq!(value.as_object().unwrap().len(), 7);
    }

    #[test]
    fn generates_runtime() {
        let js = generate_runtime();
        assert!(js.contains("const PALETTE = {"));
        assert!(js.contains("getElementById('overlay-toggle')"));
        assert!(js.contains("data-overlay-root"));
        assert!(js.contains("{ auto: 'light', light: 'dark', dark: 'auto' }"));
        assert!(js.contains("Failed to load image: ${src}"));
    }
}
