use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::render::scene::Scene;

const SVG_TEMPLATE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="{{ width | round(precision=2) }}" height="{{ height | round(precision=2) }}" viewBox="{{ view_box }}" style="background-color: #ffffff">
{%- for service in services %}
  <g class="service" data-service="{{ service.identity }}">
    <rect x="{{ service.rect.x }}" y="{{ service.rect.y }}" width="{{ service.rect.width }}" height="{{ service.rect.height }}" stroke="gray" stroke-dasharray="5,5" fill="#f5f5f5" rx="10" ry="10"/>
    <text x="{{ service.name_anchor.x }}" y="{{ service.name_anchor.y }}" fill="#009ae8">{{ service.identity }}</text>
{%- for version in service.versions %}
    <g class="version {{ version.emphasis }}" data-node="{{ version.node }}">
      <polygon points="{{ version.points }}" fill="{{ service.color }}" stroke="{{ version.stroke }}" stroke-width="{{ version.stroke_width }}" opacity="{{ version.opacity }}"/>
      <text x="{{ version.center.x }}" y="{{ version.center.y + 5 }}" text-anchor="middle" fill="white" font-size="14" font-weight="700">{{ version.version }}</text>
    </g>
{%- endfor %}
  </g>
{%- endfor %}
{%- for connection in connections %}
  <g class="connection {{ connection.emphasis }}" data-connection="{{ connection.key }}">
    <path d="{{ connection.path }}" fill="none" stroke="{{ connection.stroke }}" stroke-width="{{ connection.stroke_width }}" opacity="{{ connection.opacity }}"/>
{%- for marker in connection.markers %}
    <circle cx="{{ marker.center.x | round(precision=2) }}" cy="{{ marker.center.y | round(precision=2) }}" r="{{ marker.radius }}" fill="{{ marker.fill }}" opacity="{{ marker.opacity }}"/>
    <text x="{{ marker.center.x | round(precision=2) }}" y="{{ marker.center.y + 4 }}" text-anchor="middle" fill="white" font-size="14" font-weight="700">{{ marker.label }}</text>
{%- endfor %}
  </g>
{%- endfor %}
</svg>
"##;

pub fn render_svg(scene: &Scene) -> Result<String> {
    render_scene(SVG_TEMPLATE, scene)
}

pub fn render_svg_template(path: &Path, scene: &Scene) -> Result<String> {
    let template = fs::read_to_string(path)?;
    render_scene(&template, scene)
}

fn render_scene(template: &str, scene: &Scene) -> Result<String> {
    let context = tera::Context::from_serialize(scene)?;
    Ok(tera::Tera::one_off(template, &context, true)?)
}
