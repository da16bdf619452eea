//! Form definitions shared by validation and page rendering

use crate::gallery::render::escape_html;

/// Field input type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    TextArea,
    Select(&'static [&'static str]),
    Checkbox,
}

/// One named form field
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

/// A submittable form
#[derive(Debug)]
pub struct FormSpec {
    /// DOM id of the `<form>` element
    pub dom_id: &'static str,
    /// Endpoint the form posts to
    pub action: &'static str,
    pub fields: &'static [FieldSpec],
    /// Field checked against the email pattern when non-empty
    pub email_field: Option<&'static str>,
    pub submit_label: &'static str,
    pub submitting_label: &'static str,
}

impl FormSpec {
    /// Names of required fields, in display order
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }
}

const fn field(name: &'static str, label: &'static str, kind: FieldKind, required: bool) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required,
    }
}

const DEGREES: &[&str] = &["本科 Bachelor", "硕士 Master", "博士 PhD", "其他 Other"];
const MEETING_FORMATS: &[&str] = &["线上 Online", "线下 In person", "都可以 Either"];

/// Mentorship application form
pub static APPLICATION_FORM: FormSpec = FormSpec {
    dom_id: "application-form",
    action: "/api/applications",
    fields: &[
        field("name", "姓名 Name", FieldKind::Text, true),
        field("email", "邮箱 Email", FieldKind::Email, true),
        field("phone", "电话 Phone", FieldKind::Tel, false),
        field("university", "学校 University", FieldKind::Text, true),
        field("major", "专业 Major", FieldKind::Text, true),
        field("degree", "学位 Degree", FieldKind::Select(DEGREES), true),
        field("location", "所在地 Location", FieldKind::Text, true),
        field("current_status", "目前状态 Current status", FieldKind::Text, true),
        field("interest_topics", "感兴趣的话题 Topics of interest", FieldKind::TextArea, true),
        field("career_direction", "职业方向 Career direction", FieldKind::Text, false),
        field("preferred_meeting", "见面方式 Preferred meeting", FieldKind::Select(MEETING_FORMATS), true),
        field("preferred_time", "方便的时间 Preferred time", FieldKind::Text, false),
        field("message", "留言 Message", FieldKind::TextArea, false),
    ],
    email_field: Some("email"),
    submit_label: "提交申请 Submit",
    submitting_label: "提交中... Submitting...",
};

/// Story proposal form
pub static STORY_FORM: FormSpec = FormSpec {
    dom_id: "story-submission-form",
    action: "/api/story-submissions",
    fields: &[
        field("submitter_name", "你的名字 Your name", FieldKind::Text, true),
        field("submitter_email", "邮箱 Email", FieldKind::Email, true),
        field("story_title", "故事标题 Story title", FieldKind::Text, true),
        field("story_content", "故事内容 Your story", FieldKind::TextArea, true),
        field("allow_publish", "允许公开发布 Allow publishing", FieldKind::Checkbox, false),
        field("anonymous", "匿名发布 Publish anonymously", FieldKind::Checkbox, false),
    ],
    email_field: Some("submitter_email"),
    submit_label: "提交故事 Submit story",
    submitting_label: "提交中...",
};

/// Render a form; `form_token` identifies this form instance for the
/// duplicate-submission guard
pub fn render_form(spec: &FormSpec, form_token: &str, submit_button_id: &str) -> String {
    let fields: String = spec.fields.iter().map(render_field).collect();

    format!(
        r#"<form id="{dom_id}" class="ccmp-form" action="{action}" method="post" novalidate>
    <input type="hidden" name="form_token" value="{token}">
{fields}    <button type="submit" id="{button_id}" class="button" data-submitting-label="{submitting}">{label}</button>
</form>"#,
        dom_id = spec.dom_id,
        action = spec.action,
        token = escape_html(form_token),
        fields = fields,
        button_id = submit_button_id,
        label = escape_html(spec.submit_label),
        submitting = escape_html(spec.submitting_label),
    )
}

fn render_field(field: &FieldSpec) -> String {
    let required = if field.required { " required" } else { "" };
    let marker = if field.required { r#" <span class="required">*</span>"# } else { "" };

    let input = match field.kind {
        FieldKind::Text => input_html("text", field.name, required),
        FieldKind::Email => input_html("email", field.name, required),
        FieldKind::Tel => input_html("tel", field.name, required),
        FieldKind::TextArea => format!(
            r#"<textarea id="{name}" name="{name}" rows="5"{required}></textarea>"#,
            name = field.name,
            required = required,
        ),
        FieldKind::Select(options) => {
            let options: String = options
                .iter()
                .map(|o| format!(r#"<option value="{o}">{o}</option>"#, o = escape_html(o)))
                .collect();
            format!(
                r#"<select id="{name}" name="{name}"{required}><option value="">--</option>{options}</select>"#,
                name = field.name,
                required = required,
                options = options,
            )
        }
        FieldKind::Checkbox => {
            return format!(
                "    <label class=\"checkbox\"><input type=\"checkbox\" id=\"{name}\" name=\"{name}\"> {label}</label>\n",
                name = field.name,
                label = escape_html(field.label),
            );
        }
    };

    format!(
        "    <div class=\"form-group\"><label for=\"{name}\">{label}{marker}</label>{input}</div>\n",
        name = field.name,
        label = escape_html(field.label),
        marker = marker,
        input = input,
    )
}

fn input_html(kind: &str, name: &str, required: &str) -> String {
    format!(
        r#"<input type="{kind}" id="{name}" name="{name}"{required}>"#,
        kind = kind,
        name = name,
        required = required,
    )
}
