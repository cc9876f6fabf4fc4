use anyhow::Result;
use handlebars::Handlebars;

const HOME: &str = r#"<!DOCTYPE html>
<html>
<head><title>Library</title></head>
<body>
<h1>Library</h1>
<nav><a href="/add_author">Add author</a> | <a href="/add_book">Add book</a></nav>
{{#if error}}<p class="flash">{{error}}</p>{{/if}}
<form method="get" action="/">
  <input type="text" name="q" value="{{q}}" placeholder="Search by title">
  <button type="submit">Search</button>
</form>
{{#if books}}
<ul>
{{#each books}}
  <li>
    <strong>{{title}}</strong> (ISBN {{isbn}}) by {{author_name}}
    <form method="post" action="/book/{{id}}/delete">
      <button type="submit">Delete</button>
    </form>
  </li>
{{/each}}
</ul>
{{else}}
<p>No books found.</p>
{{/if}}
</body>
</html>
"#;

const ADD_AUTHOR: &str = r#"<!DOCTYPE html>
<html>
<head><title>Add author</title></head>
<body>
<h1>Add author</h1>
<nav><a href="/">Back to the list</a></nav>
{{#if error}}<p class="flash">{{error}}</p>{{/if}}
<form method="post" action="/add_author">
  <label>Name <input type="text" name="name" required></label>
  <label>Birth date <input type="date" name="birth_date" required></label>
  <label>Date of death <input type="date" name="date_of_death"></label>
  <button type="submit">Add author</button>
</form>
</body>
</html>
"#;

const ADD_BOOK: &str = r#"<!DOCTYPE html>
<html>
<head><title>Add book</title></head>
<body>
<h1>Add book</h1>
<nav><a href="/">Back to the list</a></nav>
{{#if error}}<p class="flash">{{error}}</p>{{/if}}
<form method="post" action="/add_book">
  <label>Title <input type="text" name="title" required></label>
  <label>ISBN <input type="text" name="isbn" required></label>
  <label>Author
    <select name="author_id" required>
      {{#each authors}}
      <option value="{{id}}">{{name}}</option>
      {{/each}}
    </select>
  </label>
  <button type="submit">Add book</button>
</form>
</body>
</html>
"#;

pub fn registry() -> Result<Handlebars<'static>> {
    let mut handlebars_registry = Handlebars::new();
    handlebars_registry.register_template_string("home", HOME)?;
    handlebars_registry.register_template_string("add_author", ADD_AUTHOR)?;
    handlebars_registry.register_template_string("add_book", ADD_BOOK)?;
    Ok(handlebars_registry)
}
