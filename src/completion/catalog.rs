//! Static SVG snippet tables and the Chinese alias table used by completion.

/// A catalog entry: the canonical name, the snippet inserted after an
/// optional `<`, and a short hint shown in the popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub label: &'static str,
    pub snippet: &'static str,
    pub description: &'static str,
}

const fn t(label: &'static str, snippet: &'static str, description: &'static str) -> Template {
    Template {
        label,
        snippet,
        description,
    }
}

pub static SVG_TAGS: &[Template] = &[
    t("svg", "svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 100 100\">\n  \n</svg>", "SVG root element"),
    t("rect", "rect x=\"0\" y=\"0\" width=\"100\" height=\"100\"/>", "Rectangle"),
    t("circle", "circle cx=\"50\" cy=\"50\" r=\"50\"/>", "Circle"),
    t("ellipse", "ellipse cx=\"50\" cy=\"50\" rx=\"40\" ry=\"30\"/>", "Ellipse"),
    t("line", "line x1=\"0\" y1=\"0\" x2=\"100\" y2=\"100\"/>", "Straight line"),
    t("polyline", "polyline points=\"0,0 50,25 50,75 100,100\"/>", "Open polyline"),
    t("polygon", "polygon points=\"50,0 100,50 50,100 0,50\"/>", "Closed polygon"),
    t("path", "path d=\"M10 10 L90 10 L90 90 L10 90 Z\"/>", "Path"),
    t("text", "text x=\"50\" y=\"50\" text-anchor=\"middle\">Hello</text>", "Text"),
    t("tspan", "tspan x=\"50\" dy=\"20\">World</tspan>", "Text span"),
    t("g", "g>\n  \n</g>", "Group"),
    t("defs", "defs>\n  \n</defs>", "Definitions"),
    t("use", "use href=\"#id\" x=\"0\" y=\"0\"/>", "Reference to another element"),
    t("image", "image href=\"image.png\" x=\"0\" y=\"0\" width=\"100\" height=\"100\"/>", "Raster image"),
    t("clipPath", "clipPath id=\"clip\">\n  \n</clipPath>", "Clipping path"),
    t(
        "linearGradient",
        "linearGradient id=\"grad\" x1=\"0%\" y1=\"0%\" x2=\"100%\" y2=\"0%\">\n  <stop offset=\"0%\" stop-color=\"red\"/>\n  <stop offset=\"100%\" stop-color=\"blue\"/>\n</linearGradient>",
        "Linear gradient",
    ),
    t(
        "radialGradient",
        "radialGradient id=\"grad\" cx=\"50%\" cy=\"50%\" r=\"50%\">\n  <stop offset=\"0%\" stop-color=\"red\"/>\n  <stop offset=\"100%\" stop-color=\"blue\"/>\n</radialGradient>",
        "Radial gradient",
    ),
    t("stop", "stop offset=\"50%\" stop-color=\"black\"/>", "Gradient stop"),
    t("pattern", "pattern id=\"pattern\" width=\"10\" height=\"10\" patternUnits=\"userSpaceOnUse\">\n  \n</pattern>", "Fill pattern"),
    t("mask", "mask id=\"mask\">\n  \n</mask>", "Mask"),
    t("filter", "filter id=\"filter\">\n  \n</filter>", "Filter"),
    t("feGaussianBlur", "feGaussianBlur in=\"SourceGraphic\" stdDeviation=\"5\"/>", "Gaussian blur"),
    t("feOffset", "feOffset in=\"SourceGraphic\" dx=\"5\" dy=\"5\"/>", "Offset"),
    t("feBlend", "feBlend in=\"SourceGraphic\" in2=\"SourceGraphic\" mode=\"multiply\"/>", "Blend"),
    t("animate", "animate attributeName=\"opacity\" from=\"1\" to=\"0\" dur=\"1s\" repeatCount=\"indefinite\"/>", "Attribute animation"),
    t(
        "animateTransform",
        "animateTransform attributeName=\"transform\" type=\"rotate\" from=\"0\" to=\"360\" dur=\"5s\" repeatCount=\"indefinite\"/>",
        "Transform animation",
    ),
    t("title", "title>SVG Title</title>", "Title"),
    t("desc", "desc>SVG Description</desc>", "Description"),
];

pub static SVG_ATTRIBUTES: &[Template] = &[
    t("xmlns", "xmlns=\"http://www.w3.org/2000/svg\"", "SVG namespace"),
    t("viewBox", "viewBox=\"0 0 100 100\"", "Viewport box"),
    t("width", "width=\"100\"", "Width"),
    t("height", "height=\"100\"", "Height"),
    t("x", "x=\"0\"", "X coordinate"),
    t("y", "y=\"0\"", "Y coordinate"),
    t("cx", "cx=\"50\"", "Center X"),
    t("cy", "cy=\"50\"", "Center Y"),
    t("r", "r=\"50\"", "Radius"),
    t("rx", "rx=\"10\"", "Corner radius X"),
    t("ry", "ry=\"10\"", "Corner radius Y"),
    t("x1", "x1=\"0\"", "Start X"),
    t("y1", "y1=\"0\"", "Start Y"),
    t("x2", "x2=\"100\"", "End X"),
    t("y2", "y2=\"100\"", "End Y"),
    t("points", "points=\"0,0 100,0 100,100\"", "Point list"),
    t("d", "d=\"M0 0 L100 0 L100 100 Z\"", "Path data"),
    t("fill", "fill=\"black\"", "Fill color"),
    t("stroke", "stroke=\"black\"", "Stroke color"),
    t("stroke-width", "stroke-width=\"1\"", "Stroke width"),
    t("stroke-linecap", "stroke-linecap=\"round\"", "Line cap style"),
    t("stroke-linejoin", "stroke-linejoin=\"round\"", "Line join style"),
    t("fill-opacity", "fill-opacity=\"0.5\"", "Fill opacity"),
    t("stroke-opacity", "stroke-opacity=\"0.5\"", "Stroke opacity"),
    t("opacity", "opacity=\"0.5\"", "Opacity"),
    t("transform", "transform=\"rotate(45)\"", "Transform"),
    t("id", "id=\"element\"", "Element id"),
    t("class", "class=\"cls\"", "CSS class"),
    t("style", "style=\"color: black\"", "Inline style"),
    t("href", "href=\"#id\"", "Link reference"),
    t("clip-path", "clip-path=\"url(#clip)\"", "Clipping path"),
    t("mask", "mask=\"url(#mask)\"", "Mask reference"),
    t("filter", "filter=\"url(#filter)\"", "Filter reference"),
    t("gradientUnits", "gradientUnits=\"userSpaceOnUse\"", "Gradient units"),
    t("offset", "offset=\"50%\"", "Gradient offset"),
    t("stop-color", "stop-color=\"black\"", "Gradient stop color"),
    t("stop-opacity", "stop-opacity=\"0.5\"", "Gradient stop opacity"),
    t("dx", "dx=\"10\"", "X shift"),
    t("dy", "dy=\"10\"", "Y shift"),
    t("text-anchor", "text-anchor=\"middle\"", "Text alignment"),
    t("dominant-baseline", "dominant-baseline=\"middle\"", "Baseline alignment"),
    t("font-size", "font-size=\"16\"", "Font size"),
    t("font-family", "font-family=\"Arial\"", "Font family"),
    t("font-weight", "font-weight=\"bold\"", "Font weight"),
    t("text-decoration", "text-decoration=\"underline\"", "Text decoration"),
    t("in", "in=\"SourceGraphic\"", "Filter input"),
    t("in2", "in2=\"SourceAlpha\"", "Second filter input"),
    t("mode", "mode=\"multiply\"", "Blend mode"),
    t("stdDeviation", "stdDeviation=\"5\"", "Standard deviation"),
    t("type", "type=\"rotate\"", "Transform type"),
    t("from", "from=\"0\"", "Start value"),
    t("to", "to=\"1\"", "End value"),
    t("dur", "dur=\"1s\"", "Duration"),
    t("repeatCount", "repeatCount=\"indefinite\"", "Repeat count"),
    t("begin", "begin=\"0s\"", "Start time"),
    t("fill", "fill=\"freeze\"", "Animation end state"),
    t("calcMode", "calcMode=\"spline\"", "Interpolation mode"),
    t("keyTimes", "keyTimes=\"0;1\"", "Key times"),
    t("values", "values=\"0;1\"", "Value list"),
];

/// Attributes whose values are colors.
pub const COLOR_ATTRIBUTES: &[&str] = &["fill", "stroke", "stop-color", "color"];

/// What a localized alias stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasTarget {
    /// A canonical element or attribute name.
    Name(&'static str),
    /// A color keyword, inserted literally.
    Color(&'static str),
}

/// Localized term to canonical target, in lookup order.
pub static ALIASES: &[(&str, AliasTarget)] = &[
    ("直线", AliasTarget::Name("line")),
    ("直线元素", AliasTarget::Name("line")),
    ("矩形", AliasTarget::Name("rect")),
    ("矩形元素", AliasTarget::Name("rect")),
    ("圆形", AliasTarget::Name("circle")),
    ("圆形元素", AliasTarget::Name("circle")),
    ("椭圆", AliasTarget::Name("ellipse")),
    ("椭圆元素", AliasTarget::Name("ellipse")),
    ("折线", AliasTarget::Name("polyline")),
    ("折线元素", AliasTarget::Name("polyline")),
    ("多边形", AliasTarget::Name("polygon")),
    ("多边形元素", AliasTarget::Name("polygon")),
    ("路径", AliasTarget::Name("path")),
    ("路径元素", AliasTarget::Name("path")),
    ("文本", AliasTarget::Name("text")),
    ("文本元素", AliasTarget::Name("text")),
    ("文本跨度", AliasTarget::Name("tspan")),
    ("文本跨度元素", AliasTarget::Name("tspan")),
    ("分组", AliasTarget::Name("g")),
    ("分组元素", AliasTarget::Name("g")),
    ("定义", AliasTarget::Name("defs")),
    ("定义元素", AliasTarget::Name("defs")),
    ("引用", AliasTarget::Name("use")),
    ("引用元素", AliasTarget::Name("use")),
    ("图像", AliasTarget::Name("image")),
    ("图像元素", AliasTarget::Name("image")),
    // Shared by the clipPath element and the clip-path attribute; the
    // attribute meaning wins.
    ("裁剪路径", AliasTarget::Name("clip-path")),
    ("裁剪路径元素", AliasTarget::Name("clipPath")),
    ("线性渐变", AliasTarget::Name("linearGradient")),
    ("线性渐变元素", AliasTarget::Name("linearGradient")),
    ("径向渐变", AliasTarget::Name("radialGradient")),
    ("径向渐变元素", AliasTarget::Name("radialGradient")),
    ("渐变停止点", AliasTarget::Name("stop")),
    ("渐变停止点元素", AliasTarget::Name("stop")),
    ("图案", AliasTarget::Name("pattern")),
    ("图案元素", AliasTarget::Name("pattern")),
    ("蒙版", AliasTarget::Name("mask")),
    ("蒙版元素", AliasTarget::Name("mask")),
    ("滤镜", AliasTarget::Name("filter")),
    ("滤镜元素", AliasTarget::Name("filter")),
    ("高斯模糊", AliasTarget::Name("feGaussianBlur")),
    ("高斯模糊元素", AliasTarget::Name("feGaussianBlur")),
    ("偏移", AliasTarget::Name("feOffset")),
    ("偏移元素", AliasTarget::Name("feOffset")),
    ("混合", AliasTarget::Name("feBlend")),
    ("混合元素", AliasTarget::Name("feBlend")),
    ("动画", AliasTarget::Name("animate")),
    ("动画元素", AliasTarget::Name("animate")),
    ("变换动画", AliasTarget::Name("animateTransform")),
    ("变换动画元素", AliasTarget::Name("animateTransform")),
    ("标题", AliasTarget::Name("title")),
    ("标题元素", AliasTarget::Name("title")),
    ("描述", AliasTarget::Name("desc")),
    ("描述元素", AliasTarget::Name("desc")),
    ("宽度", AliasTarget::Name("width")),
    ("高度", AliasTarget::Name("height")),
    ("X坐标", AliasTarget::Name("x")),
    ("Y坐标", AliasTarget::Name("y")),
    ("圆心X", AliasTarget::Name("cx")),
    ("圆心Y", AliasTarget::Name("cy")),
    ("半径", AliasTarget::Name("r")),
    ("圆角X", AliasTarget::Name("rx")),
    ("圆角Y", AliasTarget::Name("ry")),
    ("起点X", AliasTarget::Name("x1")),
    ("起点Y", AliasTarget::Name("y1")),
    ("终点X", AliasTarget::Name("x2")),
    ("终点Y", AliasTarget::Name("y2")),
    ("点", AliasTarget::Name("points")),
    ("点坐标", AliasTarget::Name("points")),
    ("路径数据", AliasTarget::Name("d")),
    ("填充", AliasTarget::Name("fill")),
    ("填充颜色", AliasTarget::Name("fill")),
    ("描边", AliasTarget::Name("stroke")),
    ("描边颜色", AliasTarget::Name("stroke")),
    ("描边宽度", AliasTarget::Name("stroke-width")),
    ("线帽", AliasTarget::Name("stroke-linecap")),
    ("线帽样式", AliasTarget::Name("stroke-linecap")),
    ("线连接", AliasTarget::Name("stroke-linejoin")),
    ("线连接样式", AliasTarget::Name("stroke-linejoin")),
    ("填充透明度", AliasTarget::Name("fill-opacity")),
    ("描边透明度", AliasTarget::Name("stroke-opacity")),
    ("透明度", AliasTarget::Name("opacity")),
    ("变换", AliasTarget::Name("transform")),
    ("ID", AliasTarget::Name("id")),
    ("元素ID", AliasTarget::Name("id")),
    ("类名", AliasTarget::Name("class")),
    ("CSS类名", AliasTarget::Name("class")),
    ("样式", AliasTarget::Name("style")),
    ("内联样式", AliasTarget::Name("style")),
    ("链接", AliasTarget::Name("href")),
    ("链接引用", AliasTarget::Name("href")),
    ("裁剪", AliasTarget::Name("clip-path")),
    ("渐变单位", AliasTarget::Name("gradientUnits")),
    ("偏移量", AliasTarget::Name("offset")),
    ("渐变偏移", AliasTarget::Name("offset")),
    ("渐变颜色", AliasTarget::Name("stop-color")),
    ("渐变透明度", AliasTarget::Name("stop-opacity")),
    ("X偏移", AliasTarget::Name("dx")),
    ("Y偏移", AliasTarget::Name("dy")),
    ("文本对齐", AliasTarget::Name("text-anchor")),
    ("基线对齐", AliasTarget::Name("dominant-baseline")),
    ("字体大小", AliasTarget::Name("font-size")),
    ("字体", AliasTarget::Name("font-family")),
    ("字重", AliasTarget::Name("font-weight")),
    ("文本装饰", AliasTarget::Name("text-decoration")),
    ("输入", AliasTarget::Name("in")),
    ("输入2", AliasTarget::Name("in2")),
    ("模式", AliasTarget::Name("mode")),
    ("混合模式", AliasTarget::Name("mode")),
    ("标准差", AliasTarget::Name("stdDeviation")),
    ("类型", AliasTarget::Name("type")),
    ("变换类型", AliasTarget::Name("type")),
    ("从", AliasTarget::Name("from")),
    ("起始值", AliasTarget::Name("from")),
    ("到", AliasTarget::Name("to")),
    ("结束值", AliasTarget::Name("to")),
    ("持续时间", AliasTarget::Name("dur")),
    ("重复次数", AliasTarget::Name("repeatCount")),
    ("开始时间", AliasTarget::Name("begin")),
    ("填充方式", AliasTarget::Name("fill")),
    ("计算模式", AliasTarget::Name("calcMode")),
    ("关键时间", AliasTarget::Name("keyTimes")),
    ("值列表", AliasTarget::Name("values")),
    ("红色", AliasTarget::Color("red")),
    ("黑色", AliasTarget::Color("black")),
    ("白色", AliasTarget::Color("white")),
    ("蓝色", AliasTarget::Color("blue")),
    ("绿色", AliasTarget::Color("green")),
    ("黄色", AliasTarget::Color("yellow")),
    ("橙色", AliasTarget::Color("orange")),
    ("紫色", AliasTarget::Color("purple")),
    ("灰色", AliasTarget::Color("grey")),
    ("粉色", AliasTarget::Color("pink")),
    ("棕色", AliasTarget::Color("brown")),
    ("青色", AliasTarget::Color("cyan")),
    ("品红", AliasTarget::Color("magenta")),
    ("透明", AliasTarget::Color("transparent")),
];

pub fn find_tag(label: &str) -> Option<&'static Template> {
    SVG_TAGS.iter().find(|tag| tag.label == label)
}

/// First attribute template with this name (`fill` has two).
pub fn find_attribute(label: &str) -> Option<&'static Template> {
    SVG_ATTRIBUTES.iter().find(|attr| attr.label == label)
}

pub fn lookup_alias(term: &str) -> Option<AliasTarget> {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == term)
        .map(|(_, target)| *target)
}

pub fn is_color_attribute(name: &str) -> bool {
    COLOR_ATTRIBUTES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_sizes() {
        assert_eq!(SVG_TAGS.len(), 28);
        assert_eq!(SVG_ATTRIBUTES.len(), 59);
    }

    #[test]
    fn aliases_are_unique_and_resolve() {
        let mut seen = HashSet::new();
        for (alias, target) in ALIASES {
            assert!(seen.insert(*alias), "duplicate alias {alias}");
            if let AliasTarget::Name(name) = target {
                assert!(
                    find_tag(name).is_some() || find_attribute(name).is_some(),
                    "alias {alias} points at unknown name {name}"
                );
            }
        }
    }

    #[test]
    fn colors_are_the_fourteen_keywords() {
        let colors = ALIASES
            .iter()
            .filter(|(_, t)| matches!(t, AliasTarget::Color(_)))
            .count();
        assert_eq!(colors, 14);
        assert_eq!(lookup_alias("红色"), Some(AliasTarget::Color("red")));
    }

    #[test]
    fn every_tag_snippet_closes_itself() {
        for tag in SVG_TAGS {
            assert!(tag.snippet.starts_with(tag.label));
            assert!(tag.snippet.contains("/>") || tag.snippet.contains("</"));
        }
    }
}
